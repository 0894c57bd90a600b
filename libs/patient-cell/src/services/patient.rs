use serde_json::{json, Map, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{DocumentStore, Query};

use crate::models::{NewPatient, Patient, PatientError, UpdatePatientRequest, PATIENTS};

pub struct PatientService {
    store: DocumentStore,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DocumentStore::new(config),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        debug!("Listing all patients");
        let patients = self.store.find(PATIENTS, &Query::new().order_asc("name")).await?;
        Ok(patients)
    }

    pub async fn get_patient(&self, patient_id: &str) -> Result<Option<Patient>, PatientError> {
        debug!("Fetching patient: {}", patient_id);
        Ok(self.store.find_by_id(PATIENTS, patient_id).await?)
    }

    pub async fn require_patient(&self, patient_id: &str) -> Result<Patient, PatientError> {
        self.get_patient(patient_id).await?.ok_or(PatientError::NotFound)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, PatientError> {
        Ok(self.store.find_one(PATIENTS, Query::new().eq("email", email)).await?)
    }

    pub async fn create_patient(&self, patient: &NewPatient) -> Result<Patient, PatientError> {
        let created: Patient = self.store.insert(PATIENTS, patient).await?;
        info!("Patient record created: {}", created.id);
        Ok(created)
    }

    /// Applies name/email changes. Fails with `NoChanges` when nothing would differ.
    pub async fn update_profile(
        &self,
        current: &Patient,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        let patch = profile_patch(current, &request)?;
        if patch.is_empty() {
            return Err(PatientError::NoChanges);
        }

        if let Some(Value::String(email)) = patch.get("email") {
            if let Some(existing) = self.find_by_email(email).await? {
                if existing.id != current.id {
                    return Err(PatientError::EmailAlreadyExists { email: email.clone() });
                }
            }
        }

        debug!("Updating patient {} fields {:?}", current.id, patch.keys().collect::<Vec<_>>());

        let mut updated: Vec<Patient> = self
            .store
            .update(PATIENTS, &Query::new().eq("id", &current.id), Value::Object(patch))
            .await?;

        if updated.is_empty() {
            return Err(PatientError::NotFound);
        }

        Ok(updated.remove(0))
    }
}

fn profile_patch(
    current: &Patient,
    request: &UpdatePatientRequest,
) -> Result<Map<String, Value>, PatientError> {
    let mut patch = Map::new();

    if let Some(name) = request.name.as_deref().map(str::trim) {
        if name.is_empty() {
            return Err(PatientError::Validation("Name cannot be empty".to_string()));
        }
        if name != current.name {
            patch.insert("name".to_string(), json!(name));
        }
    }

    if let Some(email) = request.email.as_deref().map(str::trim) {
        if !email.contains('@') {
            return Err(PatientError::Validation("A valid email is required".to_string()));
        }
        if email != current.email {
            patch.insert("email".to_string(), json!(email));
        }
    }

    Ok(patch)
}
