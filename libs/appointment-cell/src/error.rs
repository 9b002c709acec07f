// libs/appointment-cell/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use shared_database::store::StoreError;

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Unauthorized - patient ID missing")]
    Unauthorized,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Duplicate appointment: already booked with this doctor at the same time")]
    Duplicate,

    #[error("Appointment not found")]
    NotFound,

    #[error("No appointments found for this patient")]
    NoneForPatient,

    #[error("Internal server error")]
    Database(#[source] StoreError),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AppointmentError::Duplicate,
            StoreError::NotFound(_) => AppointmentError::NotFound,
            other => AppointmentError::Database(other),
        }
    }
}

impl IntoResponse for AppointmentError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppointmentError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppointmentError::Forbidden => StatusCode::FORBIDDEN,
            AppointmentError::Duplicate => StatusCode::CONFLICT,
            AppointmentError::NotFound | AppointmentError::NoneForPatient => {
                StatusCode::NOT_FOUND
            }
            AppointmentError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
