use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/patient/register", post(handlers::register_patient))
        .route("/doctor/register", post(handlers::register_doctor))
        .route("/admin/signup", post(handlers::signup_admin))
        .route("/patient/login", post(handlers::login_patient))
        .route("/doctor/login", post(handlers::login_doctor))
        .route("/admin/login", post(handlers::login_admin))
        .route("/auth/verify", post(handlers::verify_token))
        .with_state(state)
}
