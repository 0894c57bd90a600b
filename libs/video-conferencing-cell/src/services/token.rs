use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::models::RtcTokenError;
use crate::services::rtc_token::{build_token_with_uid, RtcRole};

pub const TOKEN_TTL_SECS: i64 = 3600;
const MAX_CHANNEL_LEN: usize = 64;
const MAX_ACCOUNT_LEN: usize = 255;

#[derive(Debug)]
pub struct RtcTokenService {
    app_id: String,
    app_certificate: String,
}

impl RtcTokenService {
    pub fn new(config: &AppConfig) -> Result<Self, RtcTokenError> {
        if !config.is_rtc_configured() {
            return Err(RtcTokenError::NotConfigured);
        }

        Ok(Self {
            app_id: config.agora_app_id.clone(),
            app_certificate: config.agora_app_certificate.clone(),
        })
    }

    /// Publisher token for the anonymous uid 0.
    pub fn channel_token(&self, channel_name: &str) -> Result<String, RtcTokenError> {
        validate_channel(channel_name)?;
        self.sign(channel_name, "", RtcRole::Publisher)
    }

    pub fn user_token(
        &self,
        channel_name: &str,
        uid: &Value,
        role: RtcRole,
    ) -> Result<String, RtcTokenError> {
        validate_channel(channel_name)?;
        let uid = uid_string(uid)?;
        self.sign(channel_name, &uid, role)
    }

    fn sign(&self, channel_name: &str, uid: &str, role: RtcRole) -> Result<String, RtcTokenError> {
        let expire_ts = u32::try_from(Utc::now().timestamp() + TOKEN_TTL_SECS)
            .map_err(|e| RtcTokenError::Signing(e.to_string()))?;

        let token = build_token_with_uid(
            &self.app_id,
            &self.app_certificate,
            channel_name,
            uid,
            role,
            expire_ts,
        )?;

        info!("Issued {:?} RTC token for channel {}", role, channel_name);
        Ok(token)
    }
}

fn validate_channel(channel_name: &str) -> Result<(), RtcTokenError> {
    if channel_name.len() > MAX_CHANNEL_LEN {
        return Err(RtcTokenError::InvalidChannel(format!(
            "must be at most {} bytes",
            MAX_CHANNEL_LEN
        )));
    }
    if channel_name.chars().any(|c| c.is_control()) {
        return Err(RtcTokenError::InvalidChannel("contains control characters".to_string()));
    }
    Ok(())
}

/// Numeric uids become their decimal form; other strings are used as user accounts.
pub fn uid_string(uid: &Value) -> Result<String, RtcTokenError> {
    debug!("Resolving RTC uid from {}", uid);
    match uid {
        Value::Number(n) => match n.as_u64() {
            Some(0) => Err(RtcTokenError::ChannelAndUidRequired),
            Some(v) if v <= u64::from(u32::MAX) => Ok(v.to_string()),
            _ => Err(RtcTokenError::InvalidUid(format!("{} is not a 32-bit unsigned integer", n))),
        },
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Err(RtcTokenError::ChannelAndUidRequired)
            } else if s.len() > MAX_ACCOUNT_LEN {
                Err(RtcTokenError::InvalidUid(format!("must be at most {} bytes", MAX_ACCOUNT_LEN)))
            } else {
                Ok(s.to_string())
            }
        }
        Value::Null => Err(RtcTokenError::ChannelAndUidRequired),
        other => Err(RtcTokenError::InvalidUid(format!("unsupported value {}", other))),
    }
}
