use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenRequest {
    #[serde(default)]
    pub channel_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenResponse {
    pub token: String,
    pub channel_name: String,
}

/// `uid` arrives as a number from some clients and as a string from others.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTokenRequest {
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub uid: Option<Value>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTokenResponse {
    pub token: String,
}

#[derive(Debug, Error)]
pub enum RtcTokenError {
    #[error("Channel name is required")]
    ChannelRequired,

    #[error("Channel name and UID are required")]
    ChannelAndUidRequired,

    #[error("Invalid channel name: {0}")]
    InvalidChannel(String),

    #[error("Invalid uid: {0}")]
    InvalidUid(String),

    #[error("Video conferencing is not configured")]
    NotConfigured,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl From<RtcTokenError> for AppError {
    fn from(err: RtcTokenError) -> Self {
        match err {
            RtcTokenError::ChannelRequired
            | RtcTokenError::ChannelAndUidRequired
            | RtcTokenError::InvalidChannel(_)
            | RtcTokenError::InvalidUid(_) => AppError::BadRequest(err.to_string()),
            RtcTokenError::NotConfigured => AppError::ServiceUnavailable(err.to_string()),
            RtcTokenError::Signing(msg) => AppError::Internal(msg),
        }
    }
}
