use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::models::RtcTokenError;

type HmacSha256 = Hmac<Sha256>;

pub const VERSION: &str = "006";

/// Seconds the signed message itself stays valid, independent of privilege expiry.
const MESSAGE_TTL_SECS: i64 = 24 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcRole {
    Attendee = 0,
    Publisher = 1,
    Subscriber = 2,
    Admin = 101,
}

impl RtcRole {
    /// `publisher` (any case) publishes; everything else only subscribes.
    pub fn from_request(role: Option<&str>) -> Self {
        match role.map(|r| r.trim().to_ascii_lowercase()) {
            Some(r) if r == "publisher" => RtcRole::Publisher,
            _ => RtcRole::Subscriber,
        }
    }

    pub fn can_publish(self) -> bool {
        matches!(self, RtcRole::Attendee | RtcRole::Publisher | RtcRole::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Privilege {
    JoinChannel = 1,
    PublishAudioStream = 2,
    PublishVideoStream = 3,
    PublishDataStream = 4,
}

pub struct AccessToken {
    app_id: String,
    app_certificate: String,
    channel_name: String,
    uid: String,
    salt: u32,
    ts: u32,
    privileges: BTreeMap<u16, u32>,
}

impl AccessToken {
    /// `uid` is the decimal user id, or an empty string for uid 0.
    pub fn new(app_id: &str, app_certificate: &str, channel_name: &str, uid: &str) -> Self {
        let ts = Utc::now().timestamp() + MESSAGE_TTL_SECS;

        Self {
            app_id: app_id.to_string(),
            app_certificate: app_certificate.to_string(),
            channel_name: channel_name.to_string(),
            uid: uid.to_string(),
            salt: rand::thread_rng().gen_range(1..=99_999_999),
            ts: u32::try_from(ts).unwrap_or(u32::MAX),
            privileges: BTreeMap::new(),
        }
    }

    /// Fixes salt and message timestamp so the output is reproducible.
    pub fn with_salt_and_ts(mut self, salt: u32, ts: u32) -> Self {
        self.salt = salt;
        self.ts = ts;
        self
    }

    pub fn add_privilege(&mut self, privilege: Privilege, expire_ts: u32) {
        self.privileges.insert(privilege as u16, expire_ts);
    }

    pub fn add_role_privileges(&mut self, role: RtcRole, expire_ts: u32) {
        self.add_privilege(Privilege::JoinChannel, expire_ts);
        if role.can_publish() {
            self.add_privilege(Privilege::PublishAudioStream, expire_ts);
            self.add_privilege(Privilege::PublishVideoStream, expire_ts);
            self.add_privilege(Privilege::PublishDataStream, expire_ts);
        }
    }

    pub fn build(&self) -> Result<String, RtcTokenError> {
        let message = self.pack_message()?;

        let mut mac = HmacSha256::new_from_slice(self.app_certificate.as_bytes())
            .map_err(|e| RtcTokenError::Signing(e.to_string()))?;
        mac.update(self.app_id.as_bytes());
        mac.update(self.channel_name.as_bytes());
        mac.update(self.uid.as_bytes());
        mac.update(&message);
        let signature = mac.finalize().into_bytes();

        let mut content = Vec::with_capacity(signature.len() + message.len() + 12);
        pack_bytes(&mut content, &signature)?;
        content.extend_from_slice(&crc32fast::hash(self.channel_name.as_bytes()).to_le_bytes());
        content.extend_from_slice(&crc32fast::hash(self.uid.as_bytes()).to_le_bytes());
        pack_bytes(&mut content, &message)?;

        Ok(format!("{}{}{}", VERSION, self.app_id, BASE64.encode(content)))
    }

    fn pack_message(&self) -> Result<Vec<u8>, RtcTokenError> {
        let count = u16::try_from(self.privileges.len())
            .map_err(|_| RtcTokenError::Signing("too many privileges".to_string()))?;

        let mut message = Vec::with_capacity(10 + self.privileges.len() * 6);
        message.extend_from_slice(&self.salt.to_le_bytes());
        message.extend_from_slice(&self.ts.to_le_bytes());
        message.extend_from_slice(&count.to_le_bytes());
        for (privilege, expire_ts) in &self.privileges {
            message.extend_from_slice(&privilege.to_le_bytes());
            message.extend_from_slice(&expire_ts.to_le_bytes());
        }

        Ok(message)
    }
}

fn pack_bytes(buffer: &mut Vec<u8>, bytes: &[u8]) -> Result<(), RtcTokenError> {
    let len = u16::try_from(bytes.len())
        .map_err(|_| RtcTokenError::Signing("field longer than 65535 bytes".to_string()))?;
    buffer.extend_from_slice(&len.to_le_bytes());
    buffer.extend_from_slice(bytes);
    Ok(())
}

/// Token for `uid` on `channel_name` with the privileges of `role`, valid until `expire_ts`.
pub fn build_token_with_uid(
    app_id: &str,
    app_certificate: &str,
    channel_name: &str,
    uid: &str,
    role: RtcRole,
    expire_ts: u32,
) -> Result<String, RtcTokenError> {
    let mut token = AccessToken::new(app_id, app_certificate, channel_name, uid);
    token.add_role_privileges(role, expire_ts);
    token.build()
}
