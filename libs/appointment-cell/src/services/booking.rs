use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use doctor_cell::{Doctor, DoctorService};
use patient_cell::{Patient, PatientService};
use shared_config::AppConfig;
use shared_database::{DocumentStore, Query};

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, BookAppointmentRequest,
    ScheduleAppointmentRequest, Slot, APPOINTMENTS,
};

pub struct AppointmentBookingService {
    store: DocumentStore,
    doctors: DoctorService,
    patients: PatientService,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatientRef {
    patient_id: Option<String>,
}

impl AppointmentBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DocumentStore::new(config),
            doctors: DoctorService::new(config),
            patients: PatientService::new(config),
        }
    }

    /// Books a slot for the calling patient with the requested doctor.
    pub async fn book(
        &self,
        patient: &Patient,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let slot = Slot::parse(&request.date, &request.time)?;
        let doctor = self.find_doctor(&request.doctor_id).await?;

        let appointment = new_appointment(&doctor, Some(patient), slot);
        self.insert(appointment).await
    }

    /// Admin booking on behalf of a patient, or a bare doctor slot when no patient is named.
    pub async fn schedule(
        &self,
        request: ScheduleAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let slot = Slot::parse(&request.date, &request.time)?;
        let doctor = self.find_doctor(&request.doctor_id).await?;

        let patient = match request.patient_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(
                self.patients
                    .get_patient(id)
                    .await?
                    .ok_or(AppointmentError::PatientNotFound)?,
            ),
            _ => None,
        };

        let appointment = new_appointment(&doctor, patient.as_ref(), slot);
        self.insert(appointment).await
    }

    pub async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments for patient {}", patient_id);
        let query = Query::new().eq("patientId", patient_id).order_asc("date");
        Ok(self.store.find(APPOINTMENTS, &query).await?)
    }

    pub async fn list_for_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments for doctor {}", doctor_id);
        let query = Query::new().eq("doctorId", doctor_id).order_asc("date");
        Ok(self.store.find(APPOINTMENTS, &query).await?)
    }

    /// Distinct patients that hold at least one appointment with the doctor.
    pub async fn patient_ids_for_doctor(&self, doctor_id: &str) -> Result<Vec<String>, AppointmentError> {
        let query = Query::new().eq("doctorId", doctor_id).select(&["patientId"]);
        let refs: Vec<PatientRef> = self.store.find(APPOINTMENTS, &query).await?;

        let mut ids: Vec<String> = refs.into_iter().filter_map(|r| r.patient_id).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn find_doctor(&self, doctor_id: &str) -> Result<Doctor, AppointmentError> {
        self.doctors
            .get_doctor(doctor_id.trim())
            .await?
            .ok_or(AppointmentError::DoctorNotFound)
    }

    async fn insert(&self, appointment: Appointment) -> Result<Appointment, AppointmentError> {
        let created: Appointment = self.store.insert(APPOINTMENTS, &appointment).await?;
        info!(
            "Appointment {} booked with doctor {} on {} {}",
            created.id, created.doctor_id, created.date, created.time
        );
        Ok(created)
    }
}

fn new_appointment(doctor: &Doctor, patient: Option<&Patient>, slot: Slot) -> Appointment {
    Appointment {
        id: Uuid::new_v4().to_string(),
        doctor_id: doctor.id.clone(),
        doctor_name: doctor.name.clone(),
        patient_id: patient.map(|p| p.id.clone()),
        patient_name: patient.map(|p| p.name.clone()),
        date: slot.date,
        time: slot.time,
        status: AppointmentStatus::Scheduled,
        created_at: Some(Utc::now()),
    }
}
