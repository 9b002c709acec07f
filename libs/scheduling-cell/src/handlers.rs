// libs/scheduling-cell/src/handlers.rs
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

use crate::error::ScheduleError;
use crate::models::{AssignScheduleRequest, EnrichedAssignment, ScheduleAssignment};
use crate::services::assignment::SchedulingService;

fn hospital_id_from(ctx: &AuthContext) -> Result<Uuid, ScheduleError> {
    ctx.hospital_id
        .as_deref()
        .and_then(|id| id.parse().ok())
        .ok_or(ScheduleError::MissingHospitalId)
}

#[axum::debug_handler]
pub async fn assign_schedule(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<AssignScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleAssignment>), ScheduleError> {
    if ctx.role != Role::HospitalAdmin {
        return Err(ScheduleError::Forbidden);
    }
    let hospital_id = hospital_id_from(&ctx)?;

    let service = SchedulingService::new(&state);
    let schedule = service.assign(hospital_id, request, auth.token()).await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

#[axum::debug_handler]
pub async fn get_hospital_schedules(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<EnrichedAssignment>>, ScheduleError> {
    let hospital_id = hospital_id_from(&ctx)?;

    let service = SchedulingService::new(&state);
    let schedules = service.list_by_hospital(hospital_id, auth.token()).await?;

    Ok(Json(schedules))
}

#[axum::debug_handler]
pub async fn get_user_schedules(
    State(state): State<Arc<AppConfig>>,
    Path(assigned_to): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<ScheduleAssignment>>, ScheduleError> {
    let service = SchedulingService::new(&state);
    let schedules = service.list_for_assignee(assigned_to, auth.token()).await?;

    Ok(Json(schedules))
}
