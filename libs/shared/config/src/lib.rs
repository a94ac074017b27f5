use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub backend_api_key: String,
    pub jwt_secret: String,
    pub google_client_id: String,
    pub open_time: String,
    pub close_time: String,
    pub slot_step_minutes: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            backend_url: env::var("BOOKING_BACKEND_URL")
                .unwrap_or_else(|_| {
                    warn!("BOOKING_BACKEND_URL not set, using empty value");
                    String::new()
                }),
            backend_api_key: env::var("BOOKING_BACKEND_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("BOOKING_BACKEND_API_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .unwrap_or_else(|_| {
                    warn!("GOOGLE_CLIENT_ID not set, using empty value");
                    String::new()
                }),
            open_time: env::var("SHOP_OPEN_TIME")
                .unwrap_or_else(|_| "09:00".to_string()),
            close_time: env::var("SHOP_CLOSE_TIME")
                .unwrap_or_else(|_| "20:00".to_string()),
            slot_step_minutes: env::var("SLOT_STEP_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.backend_url.is_empty()
            && !self.jwt_secret.is_empty()
    }
}
