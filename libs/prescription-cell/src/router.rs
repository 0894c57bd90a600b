use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use doctor_cell::require_doctor;
use patient_cell::require_patient;
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn prescription_routes(state: Arc<AppConfig>) -> Router {
    let doctor_routes = Router::new()
        .route("/patient/addPrescription", post(handlers::add_prescription))
        .route("/getPrescriptions/{patient_id}", get(handlers::list_prescriptions_for_patient))
        .route("/getHistory/{patient_id}", get(handlers::patient_history))
        .layer(middleware::from_fn_with_state(state.clone(), require_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let patient_routes = Router::new()
        .route("/patient/getPrescriptions", get(handlers::list_patient_prescriptions))
        .route("/patient/latestPrescription", get(handlers::latest_prescription))
        .layer(middleware::from_fn_with_state(state.clone(), require_patient))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(doctor_routes)
        .merge(patient_routes)
        .with_state(state)
}
