use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 3;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_service_key: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub agora_app_id: String,
    pub agora_app_certificate: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            database_service_key: String::new(),
            jwt_secret: String::new(),
            jwt_expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
            agora_app_id: String::new(),
            agora_app_certificate: String::new(),
            gemini_api_key: String::new(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_url: required_var("DATABASE_URL"),
            database_service_key: required_var("DATABASE_SERVICE_KEY"),
            jwt_secret: required_var("JWT_SECRET"),
            jwt_expiry_hours: parsed_var("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS),
            agora_app_id: required_var("AGORA_APP_ID"),
            agora_app_certificate: required_var("AGORA_APP_CERTIFICATE"),
            gemini_api_key: required_var("GEMINI_API_KEY"),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            port: parsed_var("PORT", DEFAULT_PORT),
            max_upload_bytes: parsed_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_url.is_empty()
            && !self.database_service_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_rtc_configured(&self) -> bool {
        !self.agora_app_id.is_empty() && !self.agora_app_certificate.is_empty()
    }

    pub fn is_ai_configured(&self) -> bool {
        !self.gemini_api_key.is_empty() && !self.gemini_base_url.is_empty()
    }
}

fn required_var(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", name);
        String::new()
    })
}

fn parsed_var<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
