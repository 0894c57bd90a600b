use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::extractor::{current_user, ensure_role};

use crate::services::DoctorService;

/// Loads the calling doctor into request extensions. Layer inside `auth_middleware`.
pub async fn require_doctor(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = current_user(&request)?;
    ensure_role(&user, Role::Doctor)?;

    let doctor = DoctorService::new(&config)
        .get_doctor(&user.id)
        .await?
        .ok_or_else(|| AppError::Auth("Doctor not found".to_string()))?;

    debug!("Authenticated doctor {}", doctor.id);
    request.extensions_mut().insert(doctor);

    Ok(next.run(request).await)
}
