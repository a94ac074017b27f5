use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{BackendClient, BackendError};

use crate::models::{AppointmentDraft, AppointmentPatch, RawBookingRecord};

/// Persistence capability of the booking flow. The backend owns the data and
/// is the final word on conflicts; this trait only moves records.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn list(&self, token: &str) -> Result<Vec<RawBookingRecord>, BackendError>;

    async fn list_for_day(
        &self,
        date: NaiveDate,
        token: &str,
    ) -> Result<Vec<RawBookingRecord>, BackendError>;

    async fn fetch(&self, id: &str, token: &str) -> Result<RawBookingRecord, BackendError>;

    async fn create(
        &self,
        draft: &AppointmentDraft,
        token: &str,
    ) -> Result<RawBookingRecord, BackendError>;

    async fn update(
        &self,
        id: &str,
        patch: &AppointmentPatch,
        token: &str,
    ) -> Result<RawBookingRecord, BackendError>;

    async fn delete(&self, id: &str, token: &str) -> Result<(), BackendError>;
}

/// `BookingStore` over the HTTP booking backend.
pub struct HttpBookingStore {
    client: BackendClient,
}

impl HttpBookingStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: BackendClient::new(config),
        }
    }

    fn draft_body(draft: &AppointmentDraft) -> Value {
        json!({
            "customer_name": draft.customer_name,
            "customer_phone": draft.customer_phone,
            "service": draft.service,
            "date": draft.date.format("%Y-%m-%d").to_string(),
            "time": draft.time,
        })
    }

    fn patch_body(patch: &AppointmentPatch) -> Value {
        let mut body = serde_json::Map::new();

        if let Some(name) = &patch.customer_name {
            body.insert("customer_name".to_string(), json!(name));
        }
        if let Some(phone) = &patch.customer_phone {
            body.insert("customer_phone".to_string(), json!(phone));
        }
        if let Some(service) = &patch.service {
            body.insert("service".to_string(), json!(service));
        }
        if let Some(date) = &patch.date {
            body.insert(
                "date".to_string(),
                json!(date.format("%Y-%m-%d").to_string()),
            );
        }
        if let Some(time) = &patch.time {
            body.insert("time".to_string(), json!(time));
        }
        if let Some(status) = &patch.status {
            body.insert("status".to_string(), json!(status));
        }

        Value::Object(body)
    }
}

#[async_trait]
impl BookingStore for HttpBookingStore {
    async fn list(&self, token: &str) -> Result<Vec<RawBookingRecord>, BackendError> {
        self.client
            .request_enveloped(Method::GET, "/api/appointments", Some(token), None)
            .await
    }

    async fn list_for_day(
        &self,
        date: NaiveDate,
        token: &str,
    ) -> Result<Vec<RawBookingRecord>, BackendError> {
        let path = format!("/api/appointments?date={}", date.format("%Y-%m-%d"));
        debug!("Listing bookings for {}", date);

        self.client.request_enveloped(Method::GET, &path, Some(token), None).await
    }

    async fn fetch(&self, id: &str, token: &str) -> Result<RawBookingRecord, BackendError> {
        let path = format!("/api/appointments/{}", id);
        self.client.request_enveloped(Method::GET, &path, Some(token), None).await
    }

    async fn create(
        &self,
        draft: &AppointmentDraft,
        token: &str,
    ) -> Result<RawBookingRecord, BackendError> {
        self.client
            .request_enveloped(
                Method::POST,
                "/api/appointments",
                Some(token),
                Some(Self::draft_body(draft)),
            )
            .await
    }

    async fn update(
        &self,
        id: &str,
        patch: &AppointmentPatch,
        token: &str,
    ) -> Result<RawBookingRecord, BackendError> {
        let path = format!("/api/appointments/{}", id);
        self.client
            .request_enveloped(Method::PUT, &path, Some(token), Some(Self::patch_body(patch)))
            .await
    }

    async fn delete(&self, id: &str, token: &str) -> Result<(), BackendError> {
        let path = format!("/api/appointments/{}", id);
        let _: Value = self
            .client
            .request_enveloped(Method::DELETE, &path, Some(token), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, ServiceKind};

    #[test]
    fn patch_body_only_carries_set_fields() {
        let patch = AppointmentPatch {
            time: Some("14:00".to_string()),
            status: Some(AppointmentStatus::Confirmed),
            ..Default::default()
        };

        let body = HttpBookingStore::patch_body(&patch);
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["time"], "14:00");
        assert_eq!(object["status"], "confirmed");
    }

    #[test]
    fn draft_body_serializes_service_code() {
        let draft = AppointmentDraft {
            customer_name: "Cliente".to_string(),
            customer_phone: "11999990000".to_string(),
            service: ServiceKind::CabeloBarba,
            date: chrono::NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            time: "09:00".to_string(),
        };

        let body = HttpBookingStore::draft_body(&draft);
        assert_eq!(body["service"], "cabelo-barba");
        assert_eq!(body["date"], "2024-06-10");
    }
}
