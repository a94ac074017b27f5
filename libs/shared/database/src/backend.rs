use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Wording the booking backend uses when a slot was taken concurrently.
/// Checked case-insensitively against failure messages.
const CONFLICT_MARKERS: &[&str] = &[
    "indispon",
    "já agendado",
    "ja agendado",
    "reservado",
    "already booked",
    "slot taken",
];

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Transport(String),

    #[error("backend error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("unexpected backend payload: {0}")]
    Decode(String),
}

impl BackendError {
    /// Whether this failure means the requested time was already booked.
    /// A 409 is authoritative; some deployments signal the same condition
    /// through a failure message instead.
    pub fn is_conflict(&self) -> bool {
        match self {
            BackendError::Http { status: 409, .. } => true,
            BackendError::Http { message, .. } => {
                let lower = message.to_lowercase();
                CONFLICT_MARKERS.iter().any(|m| lower.contains(m))
            }
            _ => false,
        }
    }
}

/// Standard response envelope of the booking backend. Missing `message`
/// and `data` fields deserialize to `None`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

pub struct BackendClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.backend_url.clone(),
            api_key: config.backend_api_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !self.api_key.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&self.api_key) {
                headers.insert("x-api-key", value);
            }
        }

        // The backend accepts the standard header; older deployments still
        // read the x-access-token spelling, so both are sent.
        if let Some(token) = auth_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
            if let Ok(value) = HeaderValue::from_str(token) {
                headers.insert("x-access-token", value);
            }
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers(auth_token));

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Backend error ({}): {}", status, error_text);

            return Err(BackendError::Http {
                status: status.as_u16(),
                message: extract_message(&error_text),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Request a path and unwrap the `{success, message, data}` envelope
    /// when the backend uses it; bare payloads pass through unchanged.
    /// A `success: false` body is a failure even on a 2xx status.
    pub async fn request_enveloped<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let value: Value = self.request(method, path, auth_token, body).await?;
        unwrap_envelope(value)
    }
}

/// Some backend routes wrap their payload in the envelope, others return it
/// bare. Only an object carrying a boolean `success` is treated as one.
fn unwrap_envelope<T>(value: Value) -> Result<T, BackendError>
where
    T: DeserializeOwned,
{
    if value.get("success").and_then(Value::as_bool).is_none() {
        return serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()));
    }

    let envelope: Envelope<Value> =
        serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))?;

    if !envelope.success {
        let message = envelope
            .message
            .unwrap_or_else(|| "backend reported failure".to_string());
        return Err(BackendError::Http { status: 200, message });
    }

    serde_json::from_value(envelope.data.unwrap_or(Value::Null))
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Pull a human-readable message out of a JSON error body, falling back to
/// the raw text.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }
    body.to_string()
}
