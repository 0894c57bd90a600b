use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{Doctor, DoctorRecommendation, RecommendDoctorRequest};
use crate::services::{DoctorService, TriageService};

pub async fn list_doctors(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctors = DoctorService::new(&config).list_doctors().await?;
    Ok(Json(doctors))
}

pub async fn get_current_doctor(Extension(doctor): Extension<Doctor>) -> Json<Doctor> {
    Json(doctor)
}

#[axum::debug_handler]
pub async fn recommend_doctor(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RecommendDoctorRequest>,
) -> Result<Json<DoctorRecommendation>, AppError> {
    let recommendation = TriageService::new(&config)?
        .recommend(&request.complaint)
        .await?;

    Ok(Json(recommendation))
}
