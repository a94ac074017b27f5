use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::session::Session;
use shared_utils::state::AppState;

use crate::models::{AppointmentDraft, AppointmentPatch, BookingError, ServiceKind};
use crate::services::booking::BookingService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub service: ServiceKind,
    /// Appointment being rescheduled, if any. Its current slot stays offered.
    pub editing: Option<String>,
}

fn map_booking_error(err: BookingError) -> AppError {
    match err {
        BookingError::NotAuthenticated => AppError::Auth("Not authenticated".to_string()),
        BookingError::SlotUnavailable => {
            AppError::Conflict("Time slot is not available".to_string())
        }
        BookingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        BookingError::Validation(msg) => AppError::ValidationError(msg),
        BookingError::Network(msg) => AppError::ExternalService(msg),
        BookingError::Server(msg) => AppError::ExternalService(msg),
    }
}

fn require_admin(user: &User) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Auth("Admin access required".to_string()))
    }
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(draft): Json<AppointmentDraft>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.config, Some(session));
    let appointment = service.create(draft).await.map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.config, Some(session));

    let appointments = match query.date {
        Some(date) => service.list_for_day(date).await,
        None => service.list().await,
    }
    .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "data": appointments
    })))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.config, Some(session));
    let slots = service
        .availability(query.date, query.service, query.editing.as_deref())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "date": query.date,
            "service": query.service,
            "slots": slots
        }
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.config, Some(session));
    let appointment = service.get(&id).await.map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.config, Some(session));
    let appointment = service.update(&id, patch).await.map_err(map_booking_error)?;

    info!("Appointment {} updated by {}", id, user.id);
    Ok(Json(json!({
        "success": true,
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = BookingService::new(&state.config, Some(session));
    service.remove(&id).await.map_err(map_booking_error)?;

    info!("Appointment {} cancelled by {}", id, user.id);
    Ok(Json(json!({
        "success": true,
        "message": "Appointment removed"
    })))
}
