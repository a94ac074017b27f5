use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_utils::session::Session;

use crate::models::{
    Appointment, AppointmentDraft, AppointmentPatch, BookingError, ServiceKind,
};
use crate::services::slots::{available_slots, extract_occupied, SlotGrid};
use crate::services::store::{BookingStore, HttpBookingStore};

/// Orchestrates the booking flow against the backing store. Availability is
/// checked locally first so obviously doomed writes never leave the process;
/// the store remains the final word on concurrent conflicts.
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    grid: SlotGrid,
    session: Option<Session>,
}

impl BookingService {
    pub fn new(config: &AppConfig, session: Option<Session>) -> Self {
        Self {
            store: Arc::new(HttpBookingStore::new(config)),
            grid: SlotGrid::from_config(config),
            session,
        }
    }

    pub fn with_store(
        store: Arc<dyn BookingStore>,
        grid: SlotGrid,
        session: Option<Session>,
    ) -> Self {
        Self {
            store,
            grid,
            session,
        }
    }

    fn require_token(&self) -> Result<&str, BookingError> {
        self.session
            .as_ref()
            .map(|session| session.token.as_str())
            .ok_or(BookingError::NotAuthenticated)
    }

    fn validate_draft(&self, draft: &AppointmentDraft) -> Result<(), BookingError> {
        if draft.customer_name.trim().is_empty() {
            return Err(BookingError::Validation(
                "customer name is required".to_string(),
            ));
        }
        if draft.customer_phone.trim().is_empty() {
            return Err(BookingError::Validation(
                "customer phone is required".to_string(),
            ));
        }
        if !self.grid.contains(&draft.time) {
            return Err(BookingError::Validation(format!(
                "{} is not a valid slot for this business day",
                draft.time
            )));
        }

        Ok(())
    }

    fn validate_patch(&self, patch: &AppointmentPatch) -> Result<(), BookingError> {
        if let Some(name) = &patch.customer_name {
            if name.trim().is_empty() {
                return Err(BookingError::Validation(
                    "customer name is required".to_string(),
                ));
            }
        }
        if let Some(phone) = &patch.customer_phone {
            if phone.trim().is_empty() {
                return Err(BookingError::Validation(
                    "customer phone is required".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Free slot labels for `date` and `service`, in day order. When
    /// `editing` names an existing appointment its current slot stays
    /// offered.
    pub async fn availability(
        &self,
        date: NaiveDate,
        service: ServiceKind,
        editing: Option<&str>,
    ) -> Result<Vec<String>, BookingError> {
        let token = self.require_token()?;

        let raw = self.store.list_for_day(date, token).await?;
        let occupied = extract_occupied(&raw, date, Some(service));

        let editing_current = match editing {
            Some(id) => {
                let record = self.store.fetch(id, token).await?;
                record.time_label().filter(|_| record.date == Some(date))
            }
            None => None,
        };

        Ok(available_slots(
            &self.grid.labels(),
            &occupied,
            editing_current.as_deref(),
        ))
    }

    pub async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, BookingError> {
        let token = self.require_token()?;
        self.validate_draft(&draft)?;

        let free = self.availability(draft.date, draft.service, None).await?;
        if !free.iter().any(|slot| slot == &draft.time) {
            warn!(
                "Slot {} on {} already taken for {}",
                draft.time, draft.date, draft.service
            );
            return Err(BookingError::SlotUnavailable);
        }

        let record = self.store.create(&draft, token).await?;
        let appointment = record
            .normalize()
            .ok_or_else(|| BookingError::Server("backend returned an unusable record".to_string()))?;

        info!(
            "Booked {} for {} at {} {}",
            appointment.service, appointment.customer_name, appointment.date, appointment.time
        );
        Ok(appointment)
    }

    pub async fn update(
        &self,
        id: &str,
        patch: AppointmentPatch,
    ) -> Result<Appointment, BookingError> {
        let token = self.require_token()?;
        self.validate_patch(&patch)?;

        let existing = self
            .store
            .fetch(id, token)
            .await?
            .normalize()
            .ok_or(BookingError::NotFound)?;

        let date = patch.date.unwrap_or(existing.date);
        let service = patch.service.unwrap_or(existing.service);
        let time = patch.time.clone().unwrap_or_else(|| existing.time.clone());

        if !self.grid.contains(&time) {
            return Err(BookingError::Validation(format!(
                "{} is not a valid slot for this business day",
                time
            )));
        }

        let free = self.availability(date, service, Some(id)).await?;
        if !free.iter().any(|slot| slot == &time) {
            return Err(BookingError::SlotUnavailable);
        }

        let record = self.store.update(id, &patch, token).await?;
        record
            .normalize()
            .ok_or_else(|| BookingError::Server("backend returned an unusable record".to_string()))
    }

    pub async fn remove(&self, id: &str) -> Result<(), BookingError> {
        let token = self.require_token()?;

        self.store.delete(id, token).await?;
        info!("Appointment {} removed", id);
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Appointment, BookingError> {
        let token = self.require_token()?;

        self.store
            .fetch(id, token)
            .await?
            .normalize()
            .ok_or(BookingError::NotFound)
    }

    /// Every normalizable appointment on `date`, ordered by slot label.
    pub async fn list_for_day(&self, date: NaiveDate) -> Result<Vec<Appointment>, BookingError> {
        let token = self.require_token()?;

        let raw = self.store.list_for_day(date, token).await?;
        let mut appointments: Vec<Appointment> = raw
            .into_iter()
            .filter_map(|record| record.normalize())
            .filter(|appointment| appointment.date == date)
            .collect();
        appointments.sort_by(|a, b| a.time.cmp(&b.time));

        Ok(appointments)
    }

    pub async fn list(&self) -> Result<Vec<Appointment>, BookingError> {
        let token = self.require_token()?;

        let raw = self.store.list(token).await?;
        let mut appointments: Vec<Appointment> = raw
            .into_iter()
            .filter_map(|record| record.normalize())
            .collect();
        appointments.sort_by(|a, b| (a.date, a.time.clone()).cmp(&(b.date, b.time.clone())));

        Ok(appointments)
    }
}
