use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{Role, TokenResponse};
use shared_models::error::AppError;
use shared_utils::extractor::bearer_token;
use shared_utils::jwt::validate_token;

use crate::models::{
    AdminSignupRequest, LoginRequest, LoginResponse, RegisterDoctorRequest, RegisterPatientRequest,
};
use crate::services::AccountService;

pub async fn register_patient(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RegisterPatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    AccountService::new(&config).register_patient(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Patient created successfully" }))))
}

pub async fn register_doctor(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RegisterDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    AccountService::new(&config).register_doctor(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Doctor created successfully" }))))
}

pub async fn signup_admin(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<AdminSignupRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    AccountService::new(&config).signup_admin(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Admin created successfully" }))))
}

pub async fn login_patient(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    login(&config, Role::Patient, request).await
}

pub async fn login_doctor(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    login(&config, Role::Doctor, request).await
}

pub async fn login_admin(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    login(&config, Role::Admin, request).await
}

async fn login(
    config: &AppConfig,
    role: Role,
    request: LoginRequest,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AccountService::new(config).login(role, request).await?;
    Ok(Json(response))
}

pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Verifying token");

    let token = bearer_token(&headers)?;
    let user = validate_token(token, &config.jwt_secret).map_err(AppError::Auth)?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        role: user.role,
    }))
}
