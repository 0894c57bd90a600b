use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{DocumentStore, Query};

use crate::models::{Doctor, DoctorError, NewDoctor, DOCTORS};

pub struct DoctorService {
    store: DocumentStore,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DocumentStore::new(config),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing all doctors");
        Ok(self.store.find(DOCTORS, &Query::new().order_asc("name")).await?)
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Option<Doctor>, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);
        Ok(self.store.find_by_id(DOCTORS, doctor_id).await?)
    }

    pub async fn require_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        self.get_doctor(doctor_id).await?.ok_or(DoctorError::NotFound)
    }

    pub async fn create_doctor(&self, doctor: &NewDoctor) -> Result<Doctor, DoctorError> {
        let created: Doctor = self.store.insert(DOCTORS, doctor).await?;
        info!("Doctor record created: {} ({})", created.id, created.speciality);
        Ok(created)
    }
}
