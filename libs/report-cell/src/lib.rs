//! Lab reports: admins upload PDFs for a patient, patients and their doctors read them back.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{ReportError, ReportSummary};
pub use router::report_routes;
pub use services::ReportService;
