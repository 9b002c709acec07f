// libs/lab-cell/src/handlers.rs
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

use crate::error::LabError;
use crate::models::{
    CreateLabOrderRequest, CreateLabTestRequest, LabOrder, LabTest, LabTestIdsRequest,
    UpdateLabOrderRequest, UpdateTestStatusRequest,
};
use crate::services::catalog::CatalogService;
use crate::services::orders::LabOrderService;

#[axum::debug_handler]
pub async fn create_lab_order(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateLabOrderRequest>,
) -> Result<(StatusCode, Json<LabOrder>), LabError> {
    let service = LabOrderService::new(&state);
    let order = service.create(request, auth.token()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[axum::debug_handler]
pub async fn get_all_lab_orders(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<LabOrder>>, LabError> {
    let service = LabOrderService::new(&state);
    let orders = service.list_all(auth.token()).await?;
    Ok(Json(orders))
}

#[axum::debug_handler]
pub async fn get_pending_lab_orders(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<LabOrder>>, LabError> {
    let service = LabOrderService::new(&state);
    let orders = service.list_pending(auth.token()).await?;
    Ok(Json(orders))
}

#[axum::debug_handler]
pub async fn get_lab_order(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<LabOrder>, LabError> {
    let service = LabOrderService::new(&state);
    let order = service.get(id, auth.token()).await?;
    Ok(Json(order))
}

#[axum::debug_handler]
pub async fn get_lab_order_by_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<LabOrder>, LabError> {
    let service = LabOrderService::new(&state);
    let order = service
        .get_by_appointment(appointment_id, auth.token())
        .await?;
    Ok(Json(order))
}

#[axum::debug_handler]
pub async fn update_lab_order_by_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateLabOrderRequest>,
) -> Result<Json<LabOrder>, LabError> {
    let service = LabOrderService::new(&state);
    let order = service
        .update_by_appointment(appointment_id, request, auth.token())
        .await?;
    Ok(Json(order))
}

#[axum::debug_handler]
pub async fn delete_lab_order_by_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, LabError> {
    let service = LabOrderService::new(&state);
    service
        .delete_by_appointment(appointment_id, auth.token())
        .await?;
    Ok(Json(json!({ "message": "Lab deleted successfully" })))
}

#[axum::debug_handler]
pub async fn update_test_status(
    State(state): State<Arc<AppConfig>>,
    Path((appointment_id, detail_id)): Path<(Uuid, Uuid)>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateTestStatusRequest>,
) -> Result<Json<LabOrder>, LabError> {
    let service = LabOrderService::new(&state);
    let order = service
        .update_test_status(appointment_id, detail_id, request, auth.token())
        .await?;
    Ok(Json(order))
}

#[axum::debug_handler]
pub async fn create_lab_test(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateLabTestRequest>,
) -> Result<(StatusCode, Json<LabTest>), LabError> {
    if ctx.role != Role::HospitalAdmin {
        return Err(LabError::Forbidden);
    }

    let service = CatalogService::new(&state);
    let test = service.create(request, auth.token()).await?;
    Ok((StatusCode::CREATED, Json(test)))
}

#[axum::debug_handler]
pub async fn get_active_lab_tests(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<LabTest>>, LabError> {
    let service = CatalogService::new(&state);
    let tests = service.list_active(auth.token()).await?;
    Ok(Json(tests))
}

#[axum::debug_handler]
pub async fn get_lab_test(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<LabTest>, LabError> {
    let service = CatalogService::new(&state);
    let test = service.get(id, auth.token()).await?;
    Ok(Json(test))
}

#[axum::debug_handler]
pub async fn get_lab_tests_by_ids(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<LabTestIdsRequest>,
) -> Result<Json<Vec<LabTest>>, LabError> {
    let service = CatalogService::new(&state);
    let tests = service.get_by_ids(&request.ids, auth.token()).await?;
    Ok(Json(tests))
}
