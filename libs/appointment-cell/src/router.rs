use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use doctor_cell::require_doctor;
use patient_cell::require_patient;
use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    let patient_routes = Router::new()
        .route("/appointments", post(handlers::book_appointment))
        .route("/patient/appointments", get(handlers::list_patient_appointments))
        .layer(middleware::from_fn_with_state(state.clone(), require_patient))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let doctor_routes = Router::new()
        .route("/getAppointments", get(handlers::list_doctor_appointments))
        .layer(middleware::from_fn_with_state(state.clone(), require_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/appointments/schedule", post(handlers::schedule_appointment))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(patient_routes)
        .merge(doctor_routes)
        .merge(admin_routes)
        .with_state(state)
}
