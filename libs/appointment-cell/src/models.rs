use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::DoctorError;
use patient_cell::PatientError;
use shared_models::error::AppError;

pub const APPOINTMENTS: &str = "appointments";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Patient booking. Any client-sent `doctorName` is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAppointmentRequest {
    pub doctor_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct AppointmentList {
    pub appointments: Vec<Appointment>,
}

/// A validated calendar slot, stored as `YYYY-MM-DD` and `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub date: String,
    pub time: String,
}

impl Slot {
    pub fn parse(date: &str, time: &str) -> Result<Self, AppointmentError> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| AppointmentError::InvalidDate(date.to_string()))?;

        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M:%S"))
            .map_err(|_| AppointmentError::InvalidTime(time.to_string()))?;

        Ok(Self {
            date: date.format("%Y-%m-%d").to_string(),
            time: time.format("%H:%M").to_string(),
        })
    }
}

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Invalid appointment date: {0}")]
    InvalidDate(String),

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error(transparent)]
    Doctor(#[from] DoctorError),

    #[error(transparent)]
    Patient(#[from] PatientError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::DoctorNotFound | AppointmentError::PatientNotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::InvalidDate(_) | AppointmentError::InvalidTime(_) => {
                AppError::ValidationError(err.to_string())
            }
            AppointmentError::Doctor(e) => e.into(),
            AppointmentError::Patient(e) => e.into(),
            AppointmentError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
