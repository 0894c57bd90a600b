use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::guard::require_doctor;
use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/doctors", get(handlers::list_doctors));

    let authenticated_routes = Router::new()
        .route("/doctors/recommend", post(handlers::recommend_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let doctor_only = Router::new()
        .route("/doctor", get(handlers::get_current_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), require_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(doctor_only)
        .with_state(state)
}
