pub mod history;
pub mod prescription;

pub use history::HistoryService;
pub use prescription::PrescriptionService;
