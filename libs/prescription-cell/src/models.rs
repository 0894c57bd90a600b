use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_ai::GeminiError;
use shared_models::error::AppError;

pub const PRESCRIPTIONS: &str = "prescriptions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(alias = "medication")]
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub frequency: String,
    #[serde(deserialize_with = "days_from_number_or_string")]
    pub days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: String,
    pub illness: String,
    pub doctor_id: String,
    pub patient_id: String,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPrescriptionRequest {
    pub illness: String,
    pub patient_id: String,
    #[serde(default)]
    pub medications: Vec<Medication>,
}

#[derive(Debug, Serialize)]
pub struct AddPrescriptionResponse {
    pub message: String,
    pub prescription: Prescription,
}

#[derive(Debug, Serialize)]
pub struct PrescriptionList {
    pub prescriptions: Vec<Prescription>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPrescription {
    pub latest_prescription: Prescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientHistory {
    pub patient_history: String,
}

#[derive(Debug, Error)]
pub enum PrescriptionError {
    #[error("No prescription found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Ai(#[from] GeminiError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<PrescriptionError> for AppError {
    fn from(err: PrescriptionError) -> Self {
        match err {
            PrescriptionError::NotFound => AppError::NotFound(err.to_string()),
            PrescriptionError::Validation(msg) => AppError::ValidationError(msg),
            PrescriptionError::Ai(GeminiError::NotConfigured) => {
                AppError::ServiceUnavailable(GeminiError::NotConfigured.to_string())
            }
            PrescriptionError::Ai(e) => AppError::ExternalService(e.to_string()),
            PrescriptionError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}

struct StringOrNumber;

impl<'de> Visitor<'de> for StringOrNumber {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or a number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
        Ok(value.to_string())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(StringOrNumber)
}

/// Clients send `days` both as `5` and as `"5"`.
fn days_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = deserializer.deserialize_any(StringOrNumber)?;
    raw.trim()
        .parse::<u32>()
        .map_err(|_| de::Error::custom(format!("days must be a whole number, got {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn medication_accepts_legacy_field_names_and_string_days() {
        let medication: Medication = serde_json::from_value(json!({
            "medication": "Amoxicillin",
            "frequency": 2,
            "days": "7"
        }))
        .unwrap();

        assert_eq!(
            medication,
            Medication {
                name: "Amoxicillin".to_string(),
                frequency: "2".to_string(),
                days: 7,
            }
        );
    }

    #[test]
    fn medication_rejects_fractional_or_text_days() {
        assert!(serde_json::from_value::<Medication>(json!({
            "name": "Ibuprofen", "frequency": "daily", "days": "a week"
        }))
        .is_err());
        assert!(serde_json::from_value::<Medication>(json!({
            "name": "Ibuprofen", "frequency": "daily", "days": 2.5
        }))
        .is_err());
    }

    #[test]
    fn medication_serializes_with_canonical_name() {
        let medication = Medication {
            name: "Paracetamol".to_string(),
            frequency: "3x daily".to_string(),
            days: 5,
        };

        let value = serde_json::to_value(&medication).unwrap();
        assert_eq!(value, json!({ "name": "Paracetamol", "frequency": "3x daily", "days": 5 }));
    }
}
