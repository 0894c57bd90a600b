use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use prescription_cell::router::prescription_routes;
use report_cell::router::report_routes;
use shared_config::AppConfig;
use video_conferencing_cell::router::video_conferencing_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let api = Router::new()
        .merge(auth_routes(state.clone()))
        .merge(patient_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(appointment_routes(state.clone()))
        .merge(report_routes(state.clone()))
        .merge(prescription_routes(state.clone()))
        .merge(video_conferencing_routes(state));

    Router::new()
        .route("/", get(|| async { "Telehealth API is running!" }))
        .nest("/api", api)
}
