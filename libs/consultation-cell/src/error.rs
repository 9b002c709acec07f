// libs/consultation-cell/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use shared_database::store::StoreError;

#[derive(Error, Debug)]
pub enum ConsultationError {
    #[error("Unauthorized: No token provided")]
    Unauthorized,

    #[error("Forbidden: Only doctors can create consultations")]
    DoctorOnly,

    #[error("Consultation not found")]
    NotFound,

    /// Lab-order sync during an update did not go through. The consultation
    /// row is already updated at this point; the caller must retry.
    #[error("Failed to update lab record")]
    LabUpdateFailed,

    #[error("{0}")]
    Cascade(String),

    #[error("Internal server error")]
    Database(#[source] StoreError),
}

impl From<StoreError> for ConsultationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ConsultationError::NotFound,
            other => ConsultationError::Database(other),
        }
    }
}

impl IntoResponse for ConsultationError {
    fn into_response(self) -> Response {
        let status = match &self {
            ConsultationError::Unauthorized => StatusCode::UNAUTHORIZED,
            ConsultationError::DoctorOnly => StatusCode::FORBIDDEN,
            ConsultationError::NotFound => StatusCode::NOT_FOUND,
            ConsultationError::LabUpdateFailed => StatusCode::BAD_REQUEST,
            ConsultationError::Cascade(_) | ConsultationError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
