// libs/consultation-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn consultation_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_consultation))
        .route("/", get(handlers::get_all_consultations))
        .route("/{id}", put(handlers::update_consultation))
        .route("/{id}", delete(handlers::delete_consultation))
        .route(
            "/appointment/{appointment_id}",
            get(handlers::get_consultation_by_appointment),
        )
        .route(
            "/patient/{patient_id}",
            get(handlers::get_patient_consultations),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
