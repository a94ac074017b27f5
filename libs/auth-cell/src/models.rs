use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::auth::User;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct OAuthExchangeRequest {
    /// Authorization code handed back by the Google popup.
    pub code: String,
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Authentication failed: {0}")]
    Rejected(String),

    #[error("OAuth exchange failed: {0}")]
    Exchange(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
