use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use doctor_cell::require_doctor;
use patient_cell::require_patient;
use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;

pub fn report_routes(state: Arc<AppConfig>) -> Router {
    let admin_routes = Router::new()
        .route("/report/upload", post(handlers::upload_report))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let patient_routes = Router::new()
        .route("/getReports", get(handlers::list_patient_reports))
        .layer(middleware::from_fn_with_state(state.clone(), require_patient))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let doctor_routes = Router::new()
        .route("/doctor/getReports", get(handlers::list_doctor_reports))
        .layer(middleware::from_fn_with_state(state.clone(), require_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let authenticated_routes = Router::new()
        .route("/report/{id}", get(handlers::download_report))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(admin_routes)
        .merge(patient_routes)
        .merge(doctor_routes)
        .merge(authenticated_routes)
        .with_state(state)
}
