use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::info;

use shared_models::auth::{TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;
use shared_utils::session::Session;
use shared_utils::state::AppState;

use crate::models::{AuthError, LoginRequest, OAuthExchangeRequest, RegisterRequest, ValidateRequest};
use crate::services::account::AccountService;
use crate::services::oauth::GoogleExchangeService;

fn map_auth_error(err: AuthError) -> AppError {
    match err {
        AuthError::InvalidToken(msg) => AppError::Auth(msg),
        AuthError::Rejected(msg) => AppError::Auth(msg),
        AuthError::Exchange(msg) => AppError::ExternalService(msg),
        AuthError::Backend(msg) => AppError::ExternalService(msg),
    }
}

/// Validate a token carried in the request body. Kept public so clients can
/// probe a stored token before attaching it to real traffic.
#[axum::debug_handler]
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user =
        validate_token(&request.token, &state.config.jwt_secret).map_err(AppError::Auth)?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

/// Same check for a token already in the Authorization header.
#[axum::debug_handler]
pub async fn verify(
    State(state): State<Arc<AppState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let user = validate_token(auth.token(), &state.config.jwt_secret).map_err(AppError::Auth)?;

    Ok(Json(json!({
        "success": true,
        "data": user
    })))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state.config);
    let auth = service
        .login(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    state
        .sessions
        .login(Session::new(auth.token.clone(), auth.user.clone()));

    Ok(Json(json!({
        "success": true,
        "data": auth
    })))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state.config);
    let auth = service
        .register(&request.name, &request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    state
        .sessions
        .login(Session::new(auth.token.clone(), auth.user.clone()));

    Ok(Json(json!({
        "success": true,
        "data": auth
    })))
}

/// Exchange a Google authorization code for a session token, then validate
/// the token locally so the response carries the resolved user.
#[axum::debug_handler]
pub async fn google_exchange(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OAuthExchangeRequest>,
) -> Result<Json<Value>, AppError> {
    let service = GoogleExchangeService::new(&state.config);
    let token = service
        .exchange(&request.code, request.redirect_uri.as_deref())
        .await
        .map_err(map_auth_error)?;

    let user = validate_token(&token, &state.config.jwt_secret).map_err(AppError::Auth)?;

    state
        .sessions
        .login(Session::new(token.clone(), user.clone()));

    info!("User {} signed in via Google", user.id);
    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": user
        }
    })))
}

#[axum::debug_handler]
pub async fn me(Extension(user): Extension<User>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": user
    }))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Json<Value> {
    state.sessions.logout();

    info!("User {} logged out", user.id);
    Json(json!({
        "success": true,
        "message": "Logged out"
    }))
}
