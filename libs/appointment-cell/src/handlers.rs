// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{AuthContext, Role};

use crate::error::AppointmentError;
use crate::models::{Appointment, BookAppointmentRequest, UpdateAppointmentRequest};
use crate::services::booking::BookingService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppointmentError> {
    if ctx.role != Role::Patient {
        return Err(AppointmentError::Forbidden);
    }
    let patient_id: Uuid = ctx
        .subject_id
        .parse()
        .map_err(|_| AppointmentError::Unauthorized)?;

    let service = BookingService::new(&state);
    let appointment = service.book(patient_id, request, auth.token()).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn get_all_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Appointment>>, AppointmentError> {
    let service = BookingService::new(&state);
    let appointments = service.list_all(auth.token()).await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Appointment>, AppointmentError> {
    let service = BookingService::new(&state);
    let appointment = service.get(id, auth.token()).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<Appointment>>, AppointmentError> {
    if ctx.role != Role::Patient {
        return Err(AppointmentError::Forbidden);
    }

    let service = BookingService::new(&state);
    let appointments = service.list_for_patient(patient_id, auth.token()).await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Appointment>>, AppointmentError> {
    let service = BookingService::new(&state);
    let appointments = service.list_for_doctor(doctor_id, auth.token()).await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn get_doctor_patients(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Uuid>>, AppointmentError> {
    let service = BookingService::new(&state);
    let patient_ids = service.patients_for_doctor(doctor_id, auth.token()).await?;
    Ok(Json(patient_ids))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, AppointmentError> {
    let service = BookingService::new(&state);
    let appointment = service.update(id, request, auth.token()).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppointmentError> {
    let service = BookingService::new(&state);
    service.delete(id, auth.token()).await?;
    Ok(Json(json!({ "message": "Appointment deleted successfully" })))
}
