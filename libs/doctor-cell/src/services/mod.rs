pub mod doctor;
pub mod triage;

pub use doctor::DoctorService;
pub use triage::TriageService;
