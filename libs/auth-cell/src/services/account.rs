use reqwest::Method;
use serde_json::{json, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_database::{BackendClient, BackendError};
use shared_utils::jwt::validate_token;

use crate::models::{AuthError, AuthResponse};
use crate::services::extract_token;

/// Login and registration are proxied to the backend, which owns the
/// credential store. The returned token is validated locally before it is
/// handed to the caller so a misbehaving backend cannot smuggle in a token
/// this server would later reject.
pub struct AccountService {
    client: BackendClient,
    jwt_secret: String,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: BackendClient::new(config),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let body = json!({ "email": email, "password": password });
        let response: Value = self
            .client
            .request(Method::POST, "/api/auth/login", None, Some(body))
            .await
            .map_err(map_backend_error)?;

        let auth = self.into_auth_response(response)?;
        info!("User {} logged in", auth.user.id);
        Ok(auth)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AuthError> {
        let body = json!({ "name": name, "email": email, "password": password });
        let response: Value = self
            .client
            .request(Method::POST, "/api/auth/register", None, Some(body))
            .await
            .map_err(map_backend_error)?;

        let auth = self.into_auth_response(response)?;
        info!("User {} registered", auth.user.id);
        Ok(auth)
    }

    pub(crate) fn into_auth_response(&self, response: Value) -> Result<AuthResponse, AuthError> {
        let token = extract_token(&response)
            .ok_or_else(|| AuthError::Backend("no token in auth response".to_string()))?;

        let user = validate_token(&token, &self.jwt_secret).map_err(AuthError::InvalidToken)?;

        Ok(AuthResponse { token, user })
    }
}

fn map_backend_error(err: BackendError) -> AuthError {
    match err {
        BackendError::Http { status: 401, message } | BackendError::Http { status: 403, message } => {
            AuthError::Rejected(message)
        }
        other => AuthError::Backend(other.to_string()),
    }
}
