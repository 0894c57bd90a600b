use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_ai::GeminiError;
use shared_models::error::AppError;

pub const DOCTORS: &str = "doctors";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(rename(serialize = "_id"), alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub speciality: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub speciality: String,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendDoctorRequest {
    pub complaint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorRecommendation {
    pub department: String,
    pub doctor: Doctor,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("No doctor found for the given department")]
    NoMatchingDoctor { department: String },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Ai(#[from] GeminiError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound | DoctorError::NoMatchingDoctor { .. } => {
                AppError::NotFound(err.to_string())
            }
            DoctorError::Validation(msg) => AppError::ValidationError(msg),
            DoctorError::Ai(GeminiError::NotConfigured) => {
                AppError::ServiceUnavailable(GeminiError::NotConfigured.to_string())
            }
            DoctorError::Ai(e) => AppError::ExternalService(e.to_string()),
            DoctorError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
