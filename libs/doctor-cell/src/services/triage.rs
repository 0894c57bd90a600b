use tracing::{debug, info};

use shared_ai::GeminiClient;
use shared_config::AppConfig;

use crate::models::{Doctor, DoctorError, DoctorRecommendation};
use crate::services::DoctorService;

const TRIAGE_MODEL: &str = "gemini-2.0-flash";

/// Routes a free-text complaint to a department and picks a doctor from it.
pub struct TriageService {
    doctors: DoctorService,
    gemini: GeminiClient,
}

impl TriageService {
    pub fn new(config: &AppConfig) -> Result<Self, DoctorError> {
        Ok(Self {
            doctors: DoctorService::new(config),
            gemini: GeminiClient::new(config)?,
        })
    }

    pub async fn recommend(&self, complaint: &str) -> Result<DoctorRecommendation, DoctorError> {
        let complaint = complaint.trim();
        if complaint.is_empty() {
            return Err(DoctorError::Validation("Complaint is required".to_string()));
        }

        let prompt = format!(
            "This is the complaint of the patient: {}. Give me the department that should handle this, give me just the word",
            complaint
        );
        let answer = self.gemini.generate_text(TRIAGE_MODEL, &prompt).await?;
        let department = normalize_department(&answer);
        debug!("Complaint triaged to department {:?}", department);

        let doctors = self.doctors.list_doctors().await?;
        let doctor = match_doctor(&doctors, &department)
            .cloned()
            .ok_or_else(|| DoctorError::NoMatchingDoctor { department: department.clone() })?;

        info!("Recommended doctor {} for department {}", doctor.id, department);
        Ok(DoctorRecommendation { department, doctor })
    }
}

/// Strips punctuation and markup the model sometimes wraps around a one-word answer.
pub fn normalize_department(answer: &str) -> String {
    answer
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '"' | '\'' | '`' | '.'))
        .to_string()
}

pub fn match_doctor<'a>(doctors: &'a [Doctor], department: &str) -> Option<&'a Doctor> {
    let wanted = department.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    doctors
        .iter()
        .find(|doctor| doctor.speciality.trim().to_lowercase() == wanted)
}
