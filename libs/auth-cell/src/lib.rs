pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::AuthError;
pub use router::auth_routes;
pub use services::{AccountService, PasswordService};
