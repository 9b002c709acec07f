// libs/billing-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn billing_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_bill))
        .route("/", get(handlers::get_all_bills))
        .route("/update-lab-charges", put(handlers::update_lab_charges))
        .route(
            "/appointment/{appointment_id}",
            get(handlers::get_bill_by_appointment),
        )
        .route("/patient/{patient_id}", get(handlers::get_patient_bills))
        .route("/{id}", get(handlers::get_bill))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
