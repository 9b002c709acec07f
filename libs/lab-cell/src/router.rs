// libs/lab-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Lab order routes, mounted under `/api/labs`.
pub fn lab_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_lab_order))
        .route("/", get(handlers::get_all_lab_orders))
        .route("/pending", get(handlers::get_pending_lab_orders))
        .route(
            "/by-appointment/{appointment_id}",
            get(handlers::get_lab_order_by_appointment),
        )
        .route(
            "/by-appointment/{appointment_id}",
            put(handlers::update_lab_order_by_appointment),
        )
        .route(
            "/by-appointment/{appointment_id}",
            delete(handlers::delete_lab_order_by_appointment),
        )
        .route(
            "/by-appointment/{appointment_id}/tests/{detail_id}",
            patch(handlers::update_test_status),
        )
        .route("/{id}", get(handlers::get_lab_order))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}

/// Catalog routes, mounted under `/api/lab-tests`.
pub fn lab_test_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_lab_test))
        .route("/", get(handlers::get_active_lab_tests))
        .route("/by-ids", post(handlers::get_lab_tests_by_ids))
        .route("/{id}", get(handlers::get_lab_test))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
