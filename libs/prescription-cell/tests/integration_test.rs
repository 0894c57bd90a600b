use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prescription_cell::router::prescription_routes;
use shared_utils::test_utils::{JwtTestUtils, MockStoreResponses, TestConfig, TestUser};

fn create_test_app(mock_server: &MockServer) -> (Router, TestConfig) {
    let config = TestConfig::with_mock_server(&mock_server.uri());
    (prescription_routes(config.to_arc()), config)
}

fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn mount_doctor(mock_server: &MockServer, doctor: &TestUser) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::doctor_record(doctor, "General Medicine", "$argon2id$hash")
        ])))
        .mount(mock_server)
        .await;
}

async fn mount_patient(mock_server: &MockServer, patient: &TestUser) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_record(patient, "$argon2id$hash")
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_doctor_adds_prescription() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let doctor = TestUser::doctor("house@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, Some(1));

    mount_doctor(&mock_server, &doctor).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/prescriptions"))
        .and(body_partial_json(json!({
            "illness": "Strep throat",
            "doctorId": doctor.id,
            "patientId": "p-1",
            "medications": [{ "name": "Amoxicillin", "frequency": "twice daily", "days": 10 }]
        })))
        .respond_with(|request: &wiremock::Request| {
            let record: Value = serde_json::from_slice(&request.body).unwrap();
            ResponseTemplate::new(201).set_body_json(json!([record]))
        })
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed(
            "POST",
            "/patient/addPrescription",
            &token,
            Some(json!({
                "illness": "Strep throat",
                "patientId": "p-1",
                "medications": [{ "medication": "Amoxicillin", "frequency": "twice daily", "days": "10" }]
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Prescription added successfully");
    assert_eq!(body["prescription"]["doctorId"], doctor.id);
    assert_eq!(body["prescription"]["medications"][0]["days"], 10);
}

#[tokio::test]
async fn test_add_prescription_without_medications_is_rejected() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let doctor = TestUser::doctor("house@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, Some(1));

    mount_doctor(&mock_server, &doctor).await;

    let response = app
        .oneshot(authed(
            "POST",
            "/patient/addPrescription",
            &token,
            Some(json!({ "illness": "Flu", "patientId": "p-1", "medications": [] })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patient_cannot_add_prescription() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let patient = TestUser::patient("asha@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, Some(1));

    let response = app
        .oneshot(authed(
            "POST",
            "/patient/addPrescription",
            &token,
            Some(json!({ "illness": "Flu", "patientId": patient.id, "medications": [] })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_patient_lists_prescriptions_newest_first() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let patient = TestUser::patient("asha@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, Some(1));

    mount_patient(&mock_server, &patient).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("patientId", format!("eq.{}", patient.id)))
        .and(query_param("order", "createdAt.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::prescription_record(&patient.id, "d-1", "Migraine"),
            MockStoreResponses::prescription_record(&patient.id, "d-2", "Flu")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed("GET", "/patient/getPrescriptions", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["prescriptions"].as_array().unwrap().len(), 2);
    assert_eq!(body["prescriptions"][0]["illness"], "Migraine");
}

#[tokio::test]
async fn test_latest_prescription() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let patient = TestUser::patient("asha@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, Some(1));

    mount_patient(&mock_server, &patient).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::prescription_record(&patient.id, "d-1", "Migraine")
        ])))
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed("GET", "/patient/latestPrescription", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["latestPrescription"]["illness"], "Migraine");
}

#[tokio::test]
async fn test_latest_prescription_when_none_exist() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let patient = TestUser::patient("asha@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, Some(1));

    mount_patient(&mock_server, &patient).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed("GET", "/patient/latestPrescription", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No prescription found");
}

#[tokio::test]
async fn test_doctor_reads_patient_prescriptions() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let doctor = TestUser::doctor("house@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, Some(1));

    mount_doctor(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("patientId", "eq.p-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::prescription_record("p-7", &doctor.id, "Asthma")
        ])))
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed("GET", "/getPrescriptions/p-7", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["prescriptions"][0]["patientId"], "p-7");
}

#[tokio::test]
async fn test_history_is_generated_from_prescriptions() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let doctor = TestUser::doctor("house@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, Some(1));

    mount_doctor(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("patientId", "eq.p-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::prescription_record("p-7", &doctor.id, "Asthma")
        ])))
        .mount(&mock_server)
        .await;

    let model_output = json!({ "patientHistory": "Treated for asthma with a five day course." });
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .and(query_param("key", "test-gemini-key"))
        .and(body_string_contains("Asthma"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": model_output.to_string() }], "role": "model" }
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed("GET", "/getHistory/p-7", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["patientHistory"], "Treated for asthma with a five day course.");
}

#[tokio::test]
async fn test_history_without_prescriptions_skips_model() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let doctor = TestUser::doctor("house@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, Some(1));

    mount_doctor(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed("GET", "/getHistory/p-new", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["patientHistory"].as_str().unwrap().contains("No prescriptions"));
}

#[tokio::test]
async fn test_history_model_failure_is_bad_gateway() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server);
    let doctor = TestUser::doctor("house@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, Some(1));

    mount_doctor(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::prescription_record("p-7", &doctor.id, "Asthma")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "not json at all" }] } }]
        })))
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(authed("GET", "/getHistory/p-7", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
