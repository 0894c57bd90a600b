use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::models::DOCTORS;
use doctor_cell::{DoctorService, NewDoctor};
use patient_cell::models::PATIENTS;
use patient_cell::{NewPatient, PatientService};
use shared_config::AppConfig;
use shared_database::{DocumentStore, Query};
use shared_models::auth::Role;
use shared_utils::jwt::issue_token;

use crate::models::{
    Admin, AdminSignupRequest, AuthError, LoginRequest, LoginResponse, NewAdmin,
    RegisterDoctorRequest, RegisterPatientRequest, StoredCredentials, ADMINS,
};
use crate::services::PasswordService;

/// Registration and login for all three account kinds. Each role lives in its own collection.
pub struct AccountService<'a> {
    config: &'a AppConfig,
    store: DocumentStore,
}

impl<'a> AccountService<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            store: DocumentStore::new(config),
        }
    }

    pub async fn register_patient(&self, request: RegisterPatientRequest) -> Result<(), AuthError> {
        require_fields(&[
            ("name", &request.name),
            ("email", &request.email),
            ("password", &request.password),
        ])?;
        self.ensure_available(Role::Patient, &request.email, &request.name).await?;

        let patient = NewPatient {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            age: request.age,
            email: request.email.trim().to_string(),
            password: PasswordService::hash_password(&request.password)?,
        };

        PatientService::new(self.config).create_patient(&patient).await?;
        info!("Registered patient {}", patient.id);
        Ok(())
    }

    pub async fn register_doctor(&self, request: RegisterDoctorRequest) -> Result<(), AuthError> {
        require_fields(&[
            ("name", &request.name),
            ("email", &request.email),
            ("password", &request.password),
            ("speciality", &request.speciality),
        ])?;
        self.ensure_available(Role::Doctor, &request.email, &request.name).await?;

        let doctor = NewDoctor {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            password: PasswordService::hash_password(&request.password)?,
            speciality: request.speciality.trim().to_string(),
            rating: request.rating,
        };

        DoctorService::new(self.config).create_doctor(&doctor).await?;
        info!("Registered doctor {}", doctor.id);
        Ok(())
    }

    pub async fn signup_admin(&self, request: AdminSignupRequest) -> Result<(), AuthError> {
        require_fields(&[
            ("name", &request.name),
            ("email", &request.email),
            ("password", &request.password),
        ])?;
        self.ensure_available(Role::Admin, &request.email, &request.name).await?;

        let admin = NewAdmin {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            password: PasswordService::hash_password(&request.password)?,
        };

        let created: Admin = self.store.insert(ADMINS, &admin).await?;
        info!("Registered admin {}", created.id);
        Ok(())
    }

    pub async fn login(&self, role: Role, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        require_fields(&[("email", &request.email), ("password", &request.password)])?;

        let credentials: StoredCredentials = self
            .store
            .find_one(
                collection_for(role),
                Query::new()
                    .eq("email", request.email.trim())
                    .select(&["id", "password"]),
            )
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !PasswordService::verify_password(&request.password, &credentials.password)? {
            warn!("Rejected {} login for {}", role, credentials.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = issue_token(
            &credentials.id,
            role,
            &self.config.jwt_secret,
            self.config.jwt_expiry_hours,
        )
        .map_err(AuthError::Token)?;

        info!("{} {} logged in", role, credentials.id);
        Ok(LoginResponse { token })
    }

    /// Email is checked before name so a returning user is told to log in.
    async fn ensure_available(&self, role: Role, email: &str, name: &str) -> Result<(), AuthError> {
        let collection = collection_for(role);
        debug!("Checking {} availability for {}", collection, email);

        let by_email: Option<Value> = self
            .store
            .find_one(collection, Query::new().eq("email", email.trim()).select(&["id"]))
            .await?;
        if by_email.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let by_name: Option<Value> = self
            .store
            .find_one(collection, Query::new().eq("name", name.trim()).select(&["id"]))
            .await?;
        if by_name.is_some() {
            return Err(AuthError::NameTaken);
        }

        Ok(())
    }
}

pub fn collection_for(role: Role) -> &'static str {
    match role {
        Role::Patient => PATIENTS,
        Role::Doctor => DOCTORS,
        Role::Admin => ADMINS,
    }
}

fn require_fields(fields: &[(&str, &String)]) -> Result<(), AuthError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(format!("Missing required fields: {}", missing.join(", "))))
    }
}
