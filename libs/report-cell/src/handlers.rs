use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Extension, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::debug;

use doctor_cell::Doctor;
use patient_cell::Patient;
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{ReportList, ReportUpload, UploadResponse};
use crate::services::ReportService;

pub async fn upload_report(
    State(config): State<Arc<AppConfig>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = ReportUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "pdf" => {
                upload.content_type = field.content_type().map(str::to_string);
                upload.file = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            }
            "name" => upload.name = Some(field.text().await.map_err(multipart_error)?),
            "patientId" => upload.patient_id = Some(field.text().await.map_err(multipart_error)?),
            "date" => upload.date = Some(field.text().await.map_err(multipart_error)?),
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let id = ReportService::new(&config).upload(upload).await?;

    Ok(Json(UploadResponse {
        message: "File uploaded and saved successfully!".to_string(),
        id,
    }))
}

pub async fn list_patient_reports(
    State(config): State<Arc<AppConfig>>,
    Extension(patient): Extension<Patient>,
) -> Result<Json<ReportList>, AppError> {
    let reports = ReportService::new(&config).list_for_patient(&patient.id).await?;
    Ok(Json(ReportList { reports }))
}

pub async fn list_doctor_reports(
    State(config): State<Arc<AppConfig>>,
    Extension(doctor): Extension<Doctor>,
) -> Result<Json<ReportList>, AppError> {
    let reports = ReportService::new(&config).list_for_doctor(&doctor.id).await?;
    Ok(Json(ReportList { reports }))
}

pub async fn download_report(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(report_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let file = ReportService::new(&config).download(&report_id, &user).await?;
    Ok(([(header::CONTENT_TYPE, file.content_type)], file.bytes))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
