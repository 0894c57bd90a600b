use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::guard::require_patient;
use crate::handlers;

pub fn patient_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/patients", get(handlers::list_patients));

    let patient_only = Router::new()
        .route("/patient", get(handlers::get_current_patient))
        .route("/patient/update", post(handlers::update_current_patient))
        .layer(middleware::from_fn_with_state(state.clone(), require_patient))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(patient_only)
        .with_state(state)
}
