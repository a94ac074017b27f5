use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use shared_models::error::AppError;

use crate::jwt::validate_token;
use crate::session::Session;
use crate::state::AppState;

/// Pull the bearer token from the request headers. The standard
/// Authorization header wins; the legacy x-access-token spelling is kept
/// for older clients.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get("Authorization") {
        if let Ok(text) = value.to_str() {
            if let Some(token) = text.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    headers
        .get("x-access-token")
        .and_then(|v| v.to_str().ok())
        .map(|t| t.to_string())
}

/// Middleware for authentication. Validates the token and injects both the
/// `User` and the full `Session` into request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let user = validate_token(&token, &state.config.jwt_secret).map_err(AppError::Auth)?;

    request.extensions_mut().insert(user.clone());
    request.extensions_mut().insert(Session::new(token, user));

    Ok(next.run(request).await)
}
