// libs/consultation-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{AuthContext, Role};

use crate::error::ConsultationError;
use crate::models::{Consultation, CreateConsultationRequest, UpdateConsultationRequest};
use crate::services::consultation::ConsultationService;

#[axum::debug_handler]
pub async fn create_consultation(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateConsultationRequest>,
) -> Result<(StatusCode, Json<Consultation>), ConsultationError> {
    if ctx.role != Role::Doctor {
        return Err(ConsultationError::DoctorOnly);
    }
    let doctor_id: Uuid = ctx
        .subject_id
        .parse()
        .map_err(|_| ConsultationError::Unauthorized)?;

    let service = ConsultationService::new(&state);
    let consultation = service.create(doctor_id, request, auth.token()).await?;

    Ok((StatusCode::CREATED, Json(consultation)))
}

#[axum::debug_handler]
pub async fn get_all_consultations(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Consultation>>, ConsultationError> {
    let service = ConsultationService::new(&state);
    let consultations = service.list_all(auth.token()).await?;
    Ok(Json(consultations))
}

#[axum::debug_handler]
pub async fn update_consultation(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateConsultationRequest>,
) -> Result<Json<Consultation>, ConsultationError> {
    let service = ConsultationService::new(&state);
    let consultation = service.update(id, request, auth.token()).await?;
    Ok(Json(consultation))
}

#[axum::debug_handler]
pub async fn delete_consultation(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<StatusCode, ConsultationError> {
    if ctx.role != Role::Doctor {
        return Err(ConsultationError::DoctorOnly);
    }

    let service = ConsultationService::new(&state);
    service.delete(id, auth.token()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_consultation_by_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Consultation>, ConsultationError> {
    let service = ConsultationService::new(&state);
    let consultation = service
        .get_by_appointment(appointment_id, auth.token())
        .await?;
    Ok(Json(consultation))
}

#[axum::debug_handler]
pub async fn get_patient_consultations(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Consultation>>, ConsultationError> {
    let service = ConsultationService::new(&state);
    let consultations = service.list_for_patient(patient_id, auth.token()).await?;
    Ok(Json(consultations))
}
