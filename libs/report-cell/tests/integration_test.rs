use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use report_cell::router::report_routes;
use shared_utils::test_utils::{JwtTestUtils, MockStoreResponses, TestConfig, TestUser};

const BOUNDARY: &str = "X-REPORT-BOUNDARY";
const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF";

fn create_test_app(mock_server: &MockServer) -> (Router, TestConfig) {
    let config = TestConfig::with_mock_server(&mock_server.uri());
    (report_routes(config.to_arc()), config)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_body(fields: &[(&str, &str)], file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }

    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"pdf\"; filename=\"labs.pdf\"\r\nContent-Type: application/pdf\r\n\r\n",
                BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/report/upload")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn stored_report(id: &str, patient_id: &str) -> Value {
    json!({
        "id": id,
        "name": "Blood panel",
        "patientId": patient_id,
        "date": "2025-03-14",
        "pdf": BASE64.encode(PDF_BYTES),
        "contentType": "application/pdf",
        "createdAt": "2025-03-14T08:00:00Z"
    })
}

#[tokio::test]
async fn test_admin_uploads_report() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let admin = TestUser::admin("root@example.com");
    let patient = TestUser::patient("asha@example.com");
    let token = JwtTestUtils::create_test_token(&admin, &config.jwt_secret, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_record(&patient, "$argon2id$hash")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/reports"))
        .and(body_partial_json(json!({
            "name": "Blood panel",
            "patientId": patient.id,
            "date": "2025-03-14",
            "contentType": "application/pdf",
            "pdf": BASE64.encode(PDF_BYTES)
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored_report("r-1", &patient.id)])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = multipart_body(
        &[("name", "Blood panel"), ("patientId", &patient.id), ("date", "2025-03-14")],
        Some(PDF_BYTES),
    );

    let response = app.oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "File uploaded and saved successfully!");
    assert_eq!(body["id"], "r-1");
}

#[tokio::test]
async fn test_upload_without_file_is_bad_request() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let admin = TestUser::admin("root@example.com");
    let token = JwtTestUtils::create_test_token(&admin, &config.jwt_secret, Some(1));

    let body = multipart_body(&[("name", "Blood panel"), ("patientId", "p-1")], None);

    let response = app.oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_for_unknown_patient_is_not_found() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let admin = TestUser::admin("root@example.com");
    let token = JwtTestUtils::create_test_token(&admin, &config.jwt_secret, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/reports"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let body = multipart_body(&[("name", "Blood panel"), ("patientId", "ghost")], Some(PDF_BYTES));

    let response = app.oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Patient not found");
}

#[tokio::test]
async fn test_upload_requires_admin() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let doctor = TestUser::doctor("house@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, Some(1));

    let body = multipart_body(&[("name", "Blood panel"), ("patientId", "p-1")], Some(PDF_BYTES));

    let response = app.oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let mock_server = MockServer::start().await;
    let mut config = TestConfig::with_mock_server(&mock_server.uri()).to_app_config();
    config.max_upload_bytes = 1024;
    let jwt_secret = config.jwt_secret.clone();
    let app = report_routes(std::sync::Arc::new(config));

    let admin = TestUser::admin("root@example.com");
    let token = JwtTestUtils::create_test_token(&admin, &jwt_secret, Some(1));

    let mut large_pdf = PDF_BYTES.to_vec();
    large_pdf.resize(8 * 1024, b'0');
    let body = multipart_body(&[("name", "Scan"), ("patientId", "p-1")], Some(&large_pdf));

    let response = app.oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_patient_lists_own_reports_without_payload() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let patient = TestUser::patient("asha@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_record(&patient, "$argon2id$hash")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/reports"))
        .and(query_param("patientId", format!("eq.{}", patient.id)))
        .and(query_param("select", "id,name,patientId,date,contentType,createdAt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "r-1",
            "name": "Blood panel",
            "patientId": patient.id,
            "date": "2025-03-14",
            "contentType": "application/pdf",
            "createdAt": "2025-03-14T08:00:00Z"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app.oneshot(get_request("/getReports", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["reports"][0]["id"], "r-1");
    assert!(body["reports"][0].get("pdf").is_none());
}

#[tokio::test]
async fn test_doctor_lists_reports_of_own_patients() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let doctor = TestUser::doctor("house@example.com");
    let patient = TestUser::patient("asha@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::doctor_record(&doctor, "Cardiology", "$argon2id$hash")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctorId", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "patientId": patient.id },
            { "patientId": patient.id }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/reports"))
        .and(query_param("patientId", format!("in.(\"{}\")", patient.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "r-9",
            "name": "ECG",
            "patientId": patient.id,
            "date": "2025-03-10"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app.oneshot(get_request("/doctor/getReports", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["reports"].as_array().unwrap().len(), 1);
    assert_eq!(body["reports"][0]["name"], "ECG");
}

#[tokio::test]
async fn test_doctor_without_appointments_sees_no_reports() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let doctor = TestUser::doctor("house@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::doctor_record(&doctor, "Cardiology", "$argon2id$hash")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let response = app.oneshot(get_request("/doctor/getReports", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["reports"], json!([]));
}

#[tokio::test]
async fn test_patient_downloads_own_report() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let patient = TestUser::patient("asha@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/reports"))
        .and(query_param("id", "eq.r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored_report("r-1", &patient.id)])))
        .mount(&mock_server)
        .await;

    let response = app.oneshot(get_request("/report/r-1", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], PDF_BYTES);
}

#[tokio::test]
async fn test_patient_cannot_download_someone_elses_report() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let patient = TestUser::patient("asha@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored_report("r-2", "another-patient")])))
        .mount(&mock_server)
        .await;

    let response = app.oneshot(get_request("/report/r-2", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_report_is_not_found() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let doctor = TestUser::doctor("house@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let response = app.oneshot(get_request("/report/nope", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Report not found");
}
