use std::sync::Arc;

use axum::{extract::State, Json};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    GenerateTokenRequest, GenerateTokenResponse, RtcTokenError, UserTokenRequest,
    UserTokenResponse,
};
use crate::services::rtc_token::RtcRole;
use crate::services::RtcTokenService;

pub async fn generate_token(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<GenerateTokenRequest>,
) -> Result<Json<GenerateTokenResponse>, AppError> {
    let channel_name = request
        .channel_name
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or(RtcTokenError::ChannelRequired)?;

    let token = RtcTokenService::new(&config)?.channel_token(&channel_name)?;

    Ok(Json(GenerateTokenResponse { token, channel_name }))
}

pub async fn generate_token_for_user(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<UserTokenRequest>,
) -> Result<Json<UserTokenResponse>, AppError> {
    let channel_name = request
        .channel_name
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or(RtcTokenError::ChannelAndUidRequired)?;
    let uid = request.uid.ok_or(RtcTokenError::ChannelAndUidRequired)?;
    let role = RtcRole::from_request(request.role.as_deref());

    let token = RtcTokenService::new(&config)?.user_token(&channel_name, &uid, role)?;

    Ok(Json(UserTokenResponse { token }))
}
