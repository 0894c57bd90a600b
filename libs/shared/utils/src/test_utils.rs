use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{JwtClaims, Role, User};

pub struct TestConfig {
    pub jwt_secret: String,
    pub database_url: String,
    pub database_service_key: String,
    pub gemini_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            database_url: "http://localhost:54321".to_string(),
            database_service_key: "test-service-key".to_string(),
            gemini_base_url: "http://localhost:54322".to_string(),
        }
    }
}

impl TestConfig {
    /// Config whose document store and AI endpoints both point at `mock_uri`.
    pub fn with_mock_server(mock_uri: &str) -> Self {
        Self {
            database_url: mock_uri.to_string(),
            gemini_base_url: mock_uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database_url.clone(),
            database_service_key: self.database_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            agora_app_id: "970CA35de60c44645bbae8a215061b33".to_string(),
            agora_app_certificate: "5CFd2fd1755d40ecb72977518be15d3b".to_string(),
            gemini_api_key: "test-gemini-key".to_string(),
            gemini_base_url: self.gemini_base_url.clone(),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("test@example.com", Role::Patient)
    }
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: email.split('@').next().unwrap_or("test").to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            role: self.role,
            issued_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let claims = JwtClaims {
            id: user.id.clone(),
            role: user.role,
            iat: now.timestamp() as u64,
            exp: exp.timestamp() as u64,
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("HS256 signing cannot fail with an HMAC key")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-2))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Store records shaped the way the cells persist them.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn patient_record(user: &TestUser, password_hash: &str) -> serde_json::Value {
        json!({
            "id": user.id,
            "name": user.name,
            "age": 34,
            "email": user.email,
            "password": password_hash,
            "bloodPressure": "120/80",
            "glucose": "90",
            "weight": "70",
            "heartRate": "72"
        })
    }

    pub fn doctor_record(user: &TestUser, speciality: &str, password_hash: &str) -> serde_json::Value {
        json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "password": password_hash,
            "speciality": speciality,
            "rating": 4.5
        })
    }

    pub fn admin_record(user: &TestUser, password_hash: &str) -> serde_json::Value {
        json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "password": password_hash
        })
    }

    pub fn appointment_record(patient: &TestUser, doctor: &TestUser) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctorId": doctor.id,
            "doctorName": doctor.name,
            "patientId": patient.id,
            "patientName": patient.name,
            "date": "2025-03-14",
            "time": "10:30",
            "status": "scheduled",
            "createdAt": "2025-03-01T09:00:00Z"
        })
    }

    pub fn prescription_record(patient_id: &str, doctor_id: &str, illness: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "illness": illness,
            "doctorId": doctor_id,
            "patientId": patient_id,
            "medications": [
                { "name": "Paracetamol", "frequency": "3x daily", "days": 5 }
            ],
            "createdAt": "2025-03-01T09:00:00Z"
        })
    }
}
