// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn schedule_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/assign", post(handlers::assign_schedule))
        .route("/hospital", get(handlers::get_hospital_schedules))
        .route("/user/{assigned_to}", get(handlers::get_user_schedules))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
