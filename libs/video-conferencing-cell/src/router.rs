use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn video_conferencing_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/generate-token", post(handlers::generate_token))
        .route("/generateToken", post(handlers::generate_token_for_user))
        .with_state(state)
}
