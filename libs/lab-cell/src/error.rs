// libs/lab-cell/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use shared_database::store::StoreError;

use crate::models::TestStatus;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Lab not found")]
    NotFound,

    #[error("Lab record not found for this appointment")]
    NotFoundForAppointment,

    #[error("Test not found in lab record")]
    TestNotFound,

    #[error("test not found")]
    CatalogNotFound,

    #[error("Invalid or empty ID list provided.")]
    EmptyIdList,

    #[error("Test status cannot move from {from} to {to}")]
    InvalidTransition { from: TestStatus, to: TestStatus },

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Internal server error")]
    Database(#[source] StoreError),
}

impl From<StoreError> for LabError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => LabError::NotFound,
            other => LabError::Database(other),
        }
    }
}

impl IntoResponse for LabError {
    fn into_response(self) -> Response {
        let status = match &self {
            LabError::NotFound
            | LabError::NotFoundForAppointment
            | LabError::TestNotFound
            | LabError::CatalogNotFound => StatusCode::NOT_FOUND,
            LabError::EmptyIdList | LabError::InvalidTransition { .. } => {
                StatusCode::BAD_REQUEST
            }
            LabError::Forbidden => StatusCode::FORBIDDEN,
            LabError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
