use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::extractor::{current_user, ensure_role};

use crate::services::PatientService;

/// Loads the calling patient into request extensions. Layer inside `auth_middleware`.
pub async fn require_patient(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = current_user(&request)?;
    ensure_role(&user, Role::Patient)?;

    let patient = PatientService::new(&config)
        .get_patient(&user.id)
        .await?
        .ok_or_else(|| AppError::Auth("Patient not found".to_string()))?;

    debug!("Authenticated patient {}", patient.id);
    request.extensions_mut().insert(patient);

    Ok(next.run(request).await)
}
