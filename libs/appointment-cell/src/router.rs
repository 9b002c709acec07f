// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/book", post(handlers::book_appointment))
        .route("/", get(handlers::get_all_appointments))
        .route("/{id}", get(handlers::get_appointment))
        .route("/{id}", put(handlers::update_appointment))
        .route("/{id}", delete(handlers::delete_appointment))
        .route("/patient/{patient_id}", get(handlers::get_patient_appointments))
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_appointments))
        .route("/doctor/{doctor_id}/patients", get(handlers::get_doctor_patients))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
