// libs/billing-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::error::BillingError;
use crate::models::{Billing, CreateBillRequest, UpdateLabChargesRequest};
use crate::services::billing::{BillingService, LabChargesOutcome};

#[axum::debug_handler]
pub async fn create_bill(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<Billing>), BillingError> {
    let service = BillingService::new(&state);
    let billing = service
        .create_bill(request.appointment_id, auth.token())
        .await?;
    Ok((StatusCode::CREATED, Json(billing)))
}

#[axum::debug_handler]
pub async fn update_lab_charges(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateLabChargesRequest>,
) -> Result<Json<Value>, BillingError> {
    let service = BillingService::new(&state);
    let outcome = service
        .update_lab_charges(request.appointment_id, auth.token())
        .await?;

    let body = match outcome {
        LabChargesOutcome::NoNewTests(billing) => json!({
            "message": "No new lab tests to add",
            "billing": billing,
        }),
        LabChargesOutcome::Updated(billing) => json!({
            "message": "Billing updated with new lab tests",
            "billing": billing,
        }),
    };
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn get_all_bills(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Billing>>, BillingError> {
    let service = BillingService::new(&state);
    let bills = service.list_all(auth.token()).await?;
    Ok(Json(bills))
}

#[axum::debug_handler]
pub async fn get_bill(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Billing>, BillingError> {
    let service = BillingService::new(&state);
    let billing = service.get(id, auth.token()).await?;
    Ok(Json(billing))
}

#[axum::debug_handler]
pub async fn get_bill_by_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Billing>, BillingError> {
    let service = BillingService::new(&state);
    let billing = service
        .get_by_appointment(appointment_id, auth.token())
        .await?;
    Ok(Json(billing))
}

#[axum::debug_handler]
pub async fn get_patient_bills(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Billing>>, BillingError> {
    let service = BillingService::new(&state);
    let bills = service.list_for_patient(patient_id, auth.token()).await?;
    Ok(Json(bills))
}
