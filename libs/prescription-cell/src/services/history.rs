use serde_json::{json, Value};
use tracing::{debug, info};

use shared_ai::GeminiClient;
use shared_config::AppConfig;

use crate::models::{PatientHistory, Prescription, PrescriptionError};
use crate::services::PrescriptionService;

const HISTORY_MODEL: &str = "gemini-1.5-pro";
const EMPTY_HISTORY: &str = "No prescriptions have been recorded for this patient yet.";

/// One-paragraph patient history written by the model from the prescription record.
pub struct HistoryService<'a> {
    config: &'a AppConfig,
    prescriptions: PrescriptionService,
}

impl<'a> HistoryService<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            prescriptions: PrescriptionService::new(config),
        }
    }

    pub async fn summarize(&self, patient_id: &str) -> Result<PatientHistory, PrescriptionError> {
        let prescriptions = self.prescriptions.list_for_patient(patient_id).await?;
        if prescriptions.is_empty() {
            debug!("Patient {} has no prescriptions, skipping model call", patient_id);
            return Ok(PatientHistory {
                patient_history: EMPTY_HISTORY.to_string(),
            });
        }

        let prompt = history_prompt(&prescriptions)?;
        let history: PatientHistory = GeminiClient::new(self.config)?
            .generate_json(HISTORY_MODEL, &prompt, history_schema())
            .await?;

        info!(
            "History generated for patient {} from {} prescriptions",
            patient_id,
            prescriptions.len()
        );
        Ok(history)
    }
}

fn history_prompt(prescriptions: &[Prescription]) -> Result<String, PrescriptionError> {
    let record = serde_json::to_string(prescriptions).map_err(anyhow::Error::from)?;
    Ok(format!(
        "Give the patient history in a paragraph using the prescriptions of the patient: {}",
        record
    ))
}

pub fn history_schema() -> Value {
    json!({
        "type": "OBJECT",
        "description": "Patient history record",
        "properties": {
            "patientHistory": {
                "type": "STRING",
                "description": "History of the patient",
                "nullable": false
            }
        },
        "required": ["patientHistory"]
    })
}
