use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};

use doctor_cell::Doctor;
use patient_cell::Patient;
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    Appointment, AppointmentList, BookAppointmentRequest, ScheduleAppointmentRequest,
};
use crate::services::AppointmentBookingService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(patient): Extension<Patient>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = AppointmentBookingService::new(&config)
        .book(&patient, request)
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn schedule_appointment(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<ScheduleAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = AppointmentBookingService::new(&config)
        .schedule(request)
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn list_patient_appointments(
    State(config): State<Arc<AppConfig>>,
    Extension(patient): Extension<Patient>,
) -> Result<Json<AppointmentList>, AppError> {
    let appointments = AppointmentBookingService::new(&config)
        .list_for_patient(&patient.id)
        .await?;

    Ok(Json(AppointmentList { appointments }))
}

pub async fn list_doctor_appointments(
    State(config): State<Arc<AppConfig>>,
    Extension(doctor): Extension<Doctor>,
) -> Result<Json<AppointmentList>, AppError> {
    let appointments = AppointmentBookingService::new(&config)
        .list_for_doctor(&doctor.id)
        .await?;

    Ok(Json(AppointmentList { appointments }))
}
