use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use doctor_cell::Doctor;
use patient_cell::Patient;
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    AddPrescriptionRequest, AddPrescriptionResponse, LatestPrescription, PatientHistory,
    PrescriptionList,
};
use crate::services::{HistoryService, PrescriptionService};

#[axum::debug_handler]
pub async fn add_prescription(
    State(config): State<Arc<AppConfig>>,
    Extension(doctor): Extension<Doctor>,
    Json(request): Json<AddPrescriptionRequest>,
) -> Result<(StatusCode, Json<AddPrescriptionResponse>), AppError> {
    let prescription = PrescriptionService::new(&config)
        .add(&doctor.id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddPrescriptionResponse {
            message: "Prescription added successfully".to_string(),
            prescription,
        }),
    ))
}

pub async fn list_patient_prescriptions(
    State(config): State<Arc<AppConfig>>,
    Extension(patient): Extension<Patient>,
) -> Result<Json<PrescriptionList>, AppError> {
    let prescriptions = PrescriptionService::new(&config)
        .list_for_patient(&patient.id)
        .await?;

    Ok(Json(PrescriptionList { prescriptions }))
}

pub async fn latest_prescription(
    State(config): State<Arc<AppConfig>>,
    Extension(patient): Extension<Patient>,
) -> Result<Json<LatestPrescription>, AppError> {
    let latest_prescription = PrescriptionService::new(&config)
        .latest_for_patient(&patient.id)
        .await?;

    Ok(Json(LatestPrescription { latest_prescription }))
}

pub async fn list_prescriptions_for_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Result<Json<PrescriptionList>, AppError> {
    let prescriptions = PrescriptionService::new(&config)
        .list_for_patient(&patient_id)
        .await?;

    Ok(Json(PrescriptionList { prescriptions }))
}

pub async fn patient_history(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientHistory>, AppError> {
    let history = HistoryService::new(&config).summarize(&patient_id).await?;
    Ok(Json(history))
}
