use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

use shared_database::store::StoreError;

use crate::models::StaffRole;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Hospital ID missing from token")]
    MissingHospitalId,

    #[error("Only hospital admins can assign schedules")]
    Forbidden,

    /// Leave conflict. Carries up to 14 candidate dates the assignee is not
    /// on leave, which downstream UIs surface as suggestions.
    #[error("{role} is on leave on {date}")]
    OnLeave {
        role: StaffRole,
        date: NaiveDate,
        available_dates: Vec<String>,
    },

    #[error("Schedule already exists for this person on the selected date and time slot.")]
    AlreadyExists,

    #[error("No schedules found for this user")]
    NoneFound,

    #[error("Directory service error: {0}")]
    Directory(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<StoreError> for ScheduleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ScheduleError::AlreadyExists,
            other => ScheduleError::Database(other.to_string()),
        }
    }
}

impl IntoResponse for ScheduleError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match &self {
            ScheduleError::MissingHospitalId => (StatusCode::BAD_REQUEST, json!({ "message": message })),
            ScheduleError::Forbidden => (StatusCode::FORBIDDEN, json!({ "message": message })),
            ScheduleError::OnLeave { available_dates, .. } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "message": message,
                    "available_dates": available_dates,
                }),
            ),
            ScheduleError::AlreadyExists => (StatusCode::BAD_REQUEST, json!({ "message": message })),
            ScheduleError::NoneFound => (StatusCode::NOT_FOUND, json!({ "message": message })),
            ScheduleError::Directory(_) => (StatusCode::BAD_GATEWAY, json!({ "message": message })),
            ScheduleError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "message": "Internal server error" }))
            }
        };

        tracing::error!("Schedule error: {}: {}", status, message);

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn store_conflict_maps_to_already_exists() {
        let err = ScheduleError::from(StoreError::Conflict("23505".to_string()));
        assert_matches!(err, ScheduleError::AlreadyExists);
    }

    #[test]
    fn other_store_failures_map_to_database() {
        let err = ScheduleError::from(StoreError::Auth("bad key".to_string()));
        assert_matches!(err, ScheduleError::Database(_));
    }
}
