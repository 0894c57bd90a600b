use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::DoctorError;
use patient_cell::PatientError;
use shared_models::error::AppError;

pub const ADMINS: &str = "admins";

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPatientRequest {
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "patient_cell::deserialize_age")]
    pub age: Option<u32>,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub speciality: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAdmin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The only columns login needs from any account collection.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredCredentials {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User already exists, please log in")]
    EmailTaken,

    #[error("Username already exists, try using a different one")]
    NameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Token(String),

    #[error(transparent)]
    Patient(#[from] PatientError),

    #[error(transparent)]
    Doctor(#[from] DoctorError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken | AuthError::NameTaken => AppError::Forbidden(err.to_string()),
            AuthError::UserNotFound => AppError::NotFound(err.to_string()),
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::Validation(msg) => AppError::ValidationError(msg),
            AuthError::Hashing(msg) | AuthError::Token(msg) => AppError::Internal(msg),
            AuthError::Patient(e) => e.into(),
            AuthError::Doctor(e) => e.into(),
            AuthError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
