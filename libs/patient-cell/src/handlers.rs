use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{Patient, UpdatePatientRequest};
use crate::services::PatientService;

pub async fn list_patients(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Vec<Patient>>, AppError> {
    let patients = PatientService::new(&config).list_patients().await?;
    Ok(Json(patients))
}

pub async fn get_current_patient(Extension(patient): Extension<Patient>) -> Json<Patient> {
    Json(patient)
}

pub async fn update_current_patient(
    State(config): State<Arc<AppConfig>>,
    Extension(patient): Extension<Patient>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    PatientService::new(&config)
        .update_profile(&patient, request)
        .await?;

    Ok(Json(json!({ "message": "Patient updated successfully" })))
}
