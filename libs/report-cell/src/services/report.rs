use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use appointment_cell::AppointmentBookingService;
use patient_cell::PatientService;
use shared_config::AppConfig;
use shared_database::{DocumentStore, Query};
use shared_models::auth::{Role, User};

use crate::models::{
    NewReport, ReportError, ReportFile, ReportSummary, ReportUpload, StoredReport,
    DEFAULT_CONTENT_TYPE, REPORTS, SUMMARY_COLUMNS,
};

const PDF_MAGIC: &[u8] = b"%PDF";

pub struct ReportService {
    store: DocumentStore,
    patients: PatientService,
    appointments: AppointmentBookingService,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DocumentStore::new(config),
            patients: PatientService::new(config),
            appointments: AppointmentBookingService::new(config),
        }
    }

    /// Stores an uploaded report and returns its id.
    pub async fn upload(&self, upload: ReportUpload) -> Result<String, ReportError> {
        let report = prepare_report(upload)?;

        if self.patients.get_patient(&report.patient_id).await?.is_none() {
            return Err(ReportError::PatientNotFound);
        }

        let created: ReportSummary = self.store.insert(REPORTS, &report).await?;
        info!("Report {} stored for patient {}", created.id, created.patient_id);
        Ok(created.id)
    }

    pub async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<ReportSummary>, ReportError> {
        debug!("Listing reports for patient {}", patient_id);
        let query = Query::new()
            .eq("patientId", patient_id)
            .select(SUMMARY_COLUMNS)
            .order_desc("createdAt");

        Ok(self.store.find(REPORTS, &query).await?)
    }

    /// Reports of every patient holding an appointment with the doctor.
    pub async fn list_for_doctor(&self, doctor_id: &str) -> Result<Vec<ReportSummary>, ReportError> {
        let patient_ids = self.appointments.patient_ids_for_doctor(doctor_id).await?;
        if patient_ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Listing reports of {} patients for doctor {}", patient_ids.len(), doctor_id);
        let query = Query::new()
            .in_list("patientId", &patient_ids)
            .select(SUMMARY_COLUMNS)
            .order_desc("createdAt");

        Ok(self.store.find(REPORTS, &query).await?)
    }

    pub async fn download(&self, report_id: &str, caller: &User) -> Result<ReportFile, ReportError> {
        let report: StoredReport = self
            .store
            .find_by_id(REPORTS, report_id)
            .await?
            .ok_or(ReportError::NotFound)?;

        if caller.role == Role::Patient && report.patient_id != caller.id {
            warn!("Patient {} denied report {}", caller.id, report.id);
            return Err(ReportError::Forbidden);
        }

        let bytes = BASE64
            .decode(report.pdf.as_bytes())
            .map_err(|e| ReportError::CorruptPayload(e.to_string()))?;

        Ok(ReportFile {
            content_type: report
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            bytes,
        })
    }
}

fn prepare_report(upload: ReportUpload) -> Result<NewReport, ReportError> {
    let file = upload
        .file
        .filter(|bytes| !bytes.is_empty())
        .ok_or(ReportError::NoFile)?;

    if !file.starts_with(PDF_MAGIC) {
        return Err(ReportError::NotPdf);
    }

    let name = non_empty(upload.name).ok_or(ReportError::MissingField("name"))?;
    let patient_id = non_empty(upload.patient_id).ok_or(ReportError::MissingField("patientId"))?;

    let date = match non_empty(upload.date) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| ReportError::InvalidDate(raw.clone()))?,
        None => Utc::now().date_naive(),
    };

    Ok(NewReport {
        id: Uuid::new_v4().to_string(),
        name,
        pdf: BASE64.encode(&file),
        content_type: non_empty(upload.content_type)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        patient_id,
        date: date.format("%Y-%m-%d").to_string(),
        created_at: Utc::now(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
