use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{DocumentStore, Query};

use crate::models::{AddPrescriptionRequest, Prescription, PrescriptionError, PRESCRIPTIONS};

pub struct PrescriptionService {
    store: DocumentStore,
}

impl PrescriptionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DocumentStore::new(config),
        }
    }

    pub async fn add(
        &self,
        doctor_id: &str,
        request: AddPrescriptionRequest,
    ) -> Result<Prescription, PrescriptionError> {
        let prescription = build_prescription(doctor_id, request)?;

        let created: Prescription = self.store.insert(PRESCRIPTIONS, &prescription).await?;
        info!(
            "Prescription {} added by doctor {} for patient {}",
            created.id, created.doctor_id, created.patient_id
        );
        Ok(created)
    }

    /// Newest first.
    pub async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<Prescription>, PrescriptionError> {
        debug!("Listing prescriptions for patient {}", patient_id);
        let query = Query::new().eq("patientId", patient_id).order_desc("createdAt");
        Ok(self.store.find(PRESCRIPTIONS, &query).await?)
    }

    pub async fn latest_for_patient(&self, patient_id: &str) -> Result<Prescription, PrescriptionError> {
        let query = Query::new().eq("patientId", patient_id).order_desc("createdAt");
        self.store
            .find_one(PRESCRIPTIONS, query)
            .await?
            .ok_or(PrescriptionError::NotFound)
    }
}

fn build_prescription(
    doctor_id: &str,
    request: AddPrescriptionRequest,
) -> Result<Prescription, PrescriptionError> {
    let illness = request.illness.trim();
    if illness.is_empty() {
        return Err(PrescriptionError::Validation("Illness is required".to_string()));
    }

    let patient_id = request.patient_id.trim();
    if patient_id.is_empty() {
        return Err(PrescriptionError::Validation("Patient id is required".to_string()));
    }

    if request.medications.is_empty() {
        return Err(PrescriptionError::Validation(
            "At least one medication is required".to_string(),
        ));
    }

    for (index, medication) in request.medications.iter().enumerate() {
        if medication.name.trim().is_empty() {
            return Err(PrescriptionError::Validation(format!(
                "Medication {} is missing a name",
                index + 1
            )));
        }
        if medication.days == 0 {
            return Err(PrescriptionError::Validation(format!(
                "Medication {} must last at least one day",
                index + 1
            )));
        }
    }

    Ok(Prescription {
        id: Uuid::new_v4().to_string(),
        illness: illness.to_string(),
        doctor_id: doctor_id.to_string(),
        patient_id: patient_id.to_string(),
        medications: request.medications,
        created_at: Some(Utc::now()),
    })
}
