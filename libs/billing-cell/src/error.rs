// libs/billing-cell/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use shared_database::store::StoreError;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Consultation not found")]
    ConsultationNotFound,

    #[error("Lab record not found")]
    LabRecordNotFound,

    #[error("No bill found")]
    BillNotFound,

    #[error("Billing record not found")]
    BillingRecordNotFound,

    /// The completion gate. Carries the offending test names so the caller
    /// can show which work is still outstanding.
    #[error("Billing cannot be created. Some lab tests are not yet completed.")]
    PendingTests(Vec<String>),

    #[error("Upstream service unavailable: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    Database(#[source] StoreError),
}

impl From<StoreError> for BillingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => BillingError::BillingRecordNotFound,
            other => BillingError::Database(other),
        }
    }
}

impl IntoResponse for BillingError {
    fn into_response(self) -> Response {
        match self {
            BillingError::PendingTests(pending) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Billing cannot be created. Some lab tests are not yet completed.",
                    "pending_tests": pending,
                })),
            )
                .into_response(),
            other => {
                let status = match &other {
                    BillingError::AppointmentNotFound
                    | BillingError::ConsultationNotFound
                    | BillingError::LabRecordNotFound
                    | BillingError::BillNotFound
                    | BillingError::BillingRecordNotFound => StatusCode::NOT_FOUND,
                    BillingError::Upstream(_) => StatusCode::BAD_GATEWAY,
                    BillingError::PendingTests(_) | BillingError::Database(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, Json(json!({ "message": other.to_string() }))).into_response()
            }
        }
    }
}
