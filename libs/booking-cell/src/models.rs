// libs/booking-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub service: ServiceKind,
    pub date: NaiveDate,
    /// Start label of the slot, `HH:MM`, always a member of the day's grid.
    pub time: String,
    pub status: AppointmentStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    Corte,
    Barba,
    CabeloBarba,
    Sombrancelha,
    Pezinho,
}

impl ServiceKind {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceKind::Corte => "corte",
            ServiceKind::Barba => "barba",
            ServiceKind::CabeloBarba => "cabelo-barba",
            ServiceKind::Sombrancelha => "sombrancelha",
            ServiceKind::Pezinho => "pezinho",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Cancelled appointments release their slot; everything else holds it.
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

// ==============================================================================
// NORMALIZATION BOUNDARY
// ==============================================================================

/// A booking record as the backend actually returns it. Older routes still
/// emit `_id` and `hour` instead of `id` and `time`, and omit `status`
/// entirely; this type is the single place that accepts every spelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBookingRecord {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub service: Option<ServiceKind>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, alias = "hour")]
    pub time: Option<String>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RawBookingRecord {
    /// The record's slot label, canonicalized to zero-padded `HH:MM`.
    /// Missing or unparseable times yield `None` and the record is skipped.
    pub fn time_label(&self) -> Option<String> {
        let raw = self.time.as_deref()?;
        let parsed = NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()?;
        Some(parsed.format("%H:%M").to_string())
    }

    /// Whether the record still claims its slot.
    pub fn is_active(&self) -> bool {
        self.status.map_or(true, |s| s.is_active())
    }

    fn identifier(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Map to the canonical appointment shape. Records without an
    /// identifier, date or valid time are unusable and dropped.
    pub fn normalize(&self) -> Option<Appointment> {
        Some(Appointment {
            id: self.identifier()?,
            customer_name: self.customer_name.clone().unwrap_or_default(),
            customer_phone: self.customer_phone.clone().unwrap_or_default(),
            service: self.service?,
            date: self.date?,
            time: self.time_label()?,
            status: self.status.unwrap_or(AppointmentStatus::Scheduled),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub customer_name: String,
    pub customer_phone: String,
    pub service: ServiceKind,
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentPatch {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub service: Option<ServiceKind>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub status: Option<AppointmentStatus>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Time slot is not available")]
    SlotUnavailable,

    #[error("Appointment not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {0}")]
    Server(String),
}

impl From<shared_database::backend::BackendError> for BookingError {
    fn from(err: shared_database::backend::BackendError) -> Self {
        use shared_database::backend::BackendError;

        if err.is_conflict() {
            return BookingError::SlotUnavailable;
        }

        match err {
            BackendError::Http { status: 404, .. } => BookingError::NotFound,
            BackendError::Transport(msg) => BookingError::Network(msg),
            other => BookingError::Server(other.to_string()),
        }
    }
}
