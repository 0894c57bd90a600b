use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

pub const PATIENTS: &str = "patients";

/// Patient record as returned to clients. The password hash stays in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename(serialize = "_id"), alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<u32>,
    pub email: String,
    #[serde(default)]
    pub blood_pressure: Option<String>,
    #[serde(default)]
    pub glucose: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub heart_rate: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub id: String,
    pub name: String,
    pub age: Option<u32>,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AgeInput {
    Number(u32),
    Text(String),
}

/// Registration forms post `age` as text; blank means unknown.
pub fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<AgeInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(AgeInput::Number(age)) => Ok(Some(age)),
        Some(AgeInput::Text(raw)) if raw.trim().is_empty() => Ok(None),
        Some(AgeInput::Text(raw)) => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("age must be a whole number, got {:?}", raw))),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("No changes were made")]
    NoChanges,

    #[error("Patient with email {email} already exists")]
    EmailAlreadyExists { email: String },

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::NoChanges => AppError::BadRequest(err.to_string()),
            PatientError::EmailAlreadyExists { .. } => AppError::Conflict(err.to_string()),
            PatientError::Validation(msg) => AppError::ValidationError(msg),
            PatientError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
