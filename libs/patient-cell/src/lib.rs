pub mod guard;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use guard::require_patient;
pub use models::{deserialize_age, NewPatient, Patient, PatientError, UpdatePatientRequest};
pub use router::patient_routes;
pub use services::PatientService;
