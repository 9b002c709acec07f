use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use consultation_cell::router::consultation_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockStoreResponses, TestConfig, TestUser};

async fn create_test_app(config: AppConfig) -> Router {
    consultation_routes(Arc::new(config))
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_request(token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_consultation_orders_lab_tests() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let doctor = TestUser::doctor();
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);
    let consultation_id = Uuid::new_v4().to_string();
    let patient_id = Uuid::new_v4().to_string();
    let appointment_id = Uuid::new_v4().to_string();
    let test_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/consultations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::consultation_response(
                &consultation_id,
                &patient_id,
                &doctor.id,
                &appointment_id,
                &[test_id.as_str()]
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/labs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(create_request(
            &token,
            json!({
                "patient_id": patient_id,
                "appointment_id": appointment_id,
                "diagnosis": "Routine checkup",
                "lab_tests": [test_id]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["id"], consultation_id);
    assert_eq!(body["doctor_id"], doctor.id);
}

#[tokio::test]
async fn test_create_consultation_survives_lab_failure() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let doctor = TestUser::doctor();
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);
    let consultation_id = Uuid::new_v4().to_string();
    let test_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/consultations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::consultation_response(
                &consultation_id,
                &Uuid::new_v4().to_string(),
                &doctor.id,
                &Uuid::new_v4().to_string(),
                &[test_id.as_str()]
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/labs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(create_request(
            &token,
            json!({
                "patient_id": Uuid::new_v4(),
                "appointment_id": Uuid::new_v4(),
                "lab_tests": [test_id]
            }),
        ))
        .await
        .unwrap();

    // The consultation is committed before propagation; a lab outage must
    // not turn the create into an error.
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_consultation_without_tests_skips_lab() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let doctor = TestUser::doctor();
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);

    Mock::given(method("POST"))
        .and(path("/rest/v1/consultations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::consultation_response(
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                &doctor.id,
                &Uuid::new_v4().to_string(),
                &[]
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/labs"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(create_request(
            &token,
            json!({
                "patient_id": Uuid::new_v4(),
                "appointment_id": Uuid::new_v4()
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_consultation_requires_doctor_role() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let nurse = TestUser::nurse();
    let token = JwtTestUtils::create_test_token(&nurse, &config.jwt_secret, None);

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(create_request(
            &token,
            json!({
                "patient_id": Uuid::new_v4(),
                "appointment_id": Uuid::new_v4()
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = read_json(response).await;
    assert_eq!(
        body["message"],
        "Forbidden: Only doctors can create consultations"
    );
}

#[tokio::test]
async fn test_update_reports_failed_lab_sync() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let doctor = TestUser::doctor();
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);
    let consultation_id = Uuid::new_v4().to_string();
    let patient_id = Uuid::new_v4().to_string();
    let appointment_id = Uuid::new_v4().to_string();
    let new_test = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/consultations"))
        .and(query_param("id", format!("eq.{}", consultation_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::consultation_response(
                &consultation_id,
                &patient_id,
                &doctor.id,
                &appointment_id,
                &[]
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/consultations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::consultation_response(
                &consultation_id,
                &patient_id,
                &doctor.id,
                &appointment_id,
                &[new_test.as_str()]
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/labs"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/api/labs/by-appointment/{}", appointment_id)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/{}", consultation_id))
                .header("Authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "lab_tests": [new_test] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Failed to update lab record");
}

#[tokio::test]
async fn test_delete_consultation_cascades_to_lab_order() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let doctor = TestUser::doctor();
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);
    let consultation_id = Uuid::new_v4().to_string();
    let appointment_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/consultations"))
        .and(query_param("id", format!("eq.{}", consultation_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::consultation_response(
                &consultation_id,
                &Uuid::new_v4().to_string(),
                &doctor.id,
                &appointment_id,
                &[]
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/consultations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/api/labs/by-appointment/{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", consultation_id))
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_consultation_by_appointment_missing_is_not_found() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let doctor = TestUser::doctor();
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/consultations"))
        .and(query_param("appointment_id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/appointment/{}", appointment_id))
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Consultation not found");
}
