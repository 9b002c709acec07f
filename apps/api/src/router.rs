use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use billing_cell::router::billing_routes;
use consultation_cell::router::consultation_routes;
use lab_cell::router::{lab_routes, lab_test_routes};
use scheduling_cell::router::schedule_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Hospital Management API is running!" }))
        .nest("/api/schedule", schedule_routes(state.clone()))
        .nest("/api/appointment", appointment_routes(state.clone()))
        .nest("/api/consultations", consultation_routes(state.clone()))
        .nest("/api/labs", lab_routes(state.clone()))
        .nest("/api/lab-tests", lab_test_routes(state.clone()))
        .nest("/api/billing", billing_routes(state))
}
