use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use appointment_cell::AppointmentError;
use patient_cell::PatientError;
use shared_models::error::AppError;

pub const REPORTS: &str = "reports";
pub const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

/// Columns returned by listings. The payload column is never among them.
pub const SUMMARY_COLUMNS: &[&str] = &["id", "name", "patientId", "date", "contentType", "createdAt"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: String,
    pub name: String,
    pub patient_id: String,
    pub date: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub id: String,
    pub name: String,
    /// Base64 of the uploaded bytes.
    pub pdf: String,
    pub content_type: String,
    pub patient_id: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub id: String,
    pub name: String,
    pub patient_id: String,
    pub pdf: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Multipart form fields collected by the upload handler.
#[derive(Debug, Clone, Default)]
pub struct ReportUpload {
    pub name: Option<String>,
    pub patient_id: Option<String>,
    pub date: Option<String>,
    pub file: Option<Vec<u8>>,
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportList {
    pub reports: Vec<ReportSummary>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub id: String,
}

/// Decoded payload ready to be written to the response body.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Uploaded file is not a PDF document")]
    NotPdf,

    #[error("Invalid report date: {0}")]
    InvalidDate(String),

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Report not found")]
    NotFound,

    #[error("Reports can only be viewed by their patient")]
    Forbidden,

    #[error("Stored report payload is corrupt: {0}")]
    CorruptPayload(String),

    #[error(transparent)]
    Patient(#[from] PatientError),

    #[error(transparent)]
    Appointment(#[from] AppointmentError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NoFile | ReportError::NotPdf => AppError::BadRequest(err.to_string()),
            ReportError::MissingField(_) | ReportError::InvalidDate(_) => {
                AppError::ValidationError(err.to_string())
            }
            ReportError::PatientNotFound | ReportError::NotFound => AppError::NotFound(err.to_string()),
            ReportError::Forbidden => AppError::Forbidden(err.to_string()),
            ReportError::CorruptPayload(msg) => AppError::Internal(msg),
            ReportError::Patient(e) => e.into(),
            ReportError::Appointment(e) => e.into(),
            ReportError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
