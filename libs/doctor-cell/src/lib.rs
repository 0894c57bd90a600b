pub mod guard;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use guard::require_doctor;
pub use models::{Doctor, DoctorError, NewDoctor};
pub use router::doctor_routes;
pub use services::{DoctorService, TriageService};
