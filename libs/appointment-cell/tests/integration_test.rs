use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::router::appointment_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockStoreResponses, TestConfig, TestUser};

async fn create_test_app(config: AppConfig) -> Router {
    appointment_routes(Arc::new(config))
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn book_request(token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/book")
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_book_appointment_success() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let patient = TestUser::patient();
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);
    let doctor_id = Uuid::new_v4().to_string();
    let appointment_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::appointment_response(
                &appointment_id,
                &patient.id,
                &doctor_id,
                "2025-06-10T10:00:00Z"
            )
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(book_request(
            &token,
            json!({
                "doctor_id": doctor_id,
                "department_id": Uuid::new_v4(),
                "hospital_id": Uuid::new_v4(),
                "appointment_date": "2025-06-10T10:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["id"], appointment_id);
    assert_eq!(body["status"], "SCHEDULED");
    assert_eq!(body["patient_id"], patient.id);
}

#[tokio::test]
async fn test_book_appointment_duplicate_is_conflict() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let patient = TestUser::patient();
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(book_request(
            &token,
            json!({
                "doctor_id": Uuid::new_v4(),
                "department_id": Uuid::new_v4(),
                "hospital_id": Uuid::new_v4(),
                "appointment_date": "2025-06-10T10:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json(response).await;
    assert_eq!(
        body["message"],
        "Duplicate appointment: already booked with this doctor at the same time"
    );
}

#[tokio::test]
async fn test_booking_same_doctor_one_minute_later_is_distinct() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let patient = TestUser::patient();
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);
    let doctor_id = Uuid::new_v4().to_string();
    let first_id = Uuid::new_v4().to_string();
    let second_id = Uuid::new_v4().to_string();

    // The unique index matches on the exact instant, so a booking one
    // minute later is a new row, not a duplicate.
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(
            json!({ "appointment_date": "2025-06-10T10:00:00Z" }),
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::appointment_response(
                &first_id,
                &patient.id,
                &doctor_id,
                "2025-06-10T10:00:00Z"
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(
            json!({ "appointment_date": "2025-06-10T10:01:00Z" }),
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::appointment_response(
                &second_id,
                &patient.id,
                &doctor_id,
                "2025-06-10T10:01:00Z"
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;

    let response = app
        .clone()
        .oneshot(book_request(
            &token,
            json!({
                "doctor_id": doctor_id,
                "department_id": Uuid::new_v4(),
                "hospital_id": Uuid::new_v4(),
                "appointment_date": "2025-06-10T10:00:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["id"], first_id);

    let response = app
        .oneshot(book_request(
            &token,
            json!({
                "doctor_id": doctor_id,
                "department_id": Uuid::new_v4(),
                "hospital_id": Uuid::new_v4(),
                "appointment_date": "2025-06-10T10:01:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["id"], second_id);
}

#[tokio::test]
async fn test_book_appointment_requires_patient_role() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let doctor = TestUser::doctor();
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(book_request(
            &token,
            json!({
                "doctor_id": Uuid::new_v4(),
                "department_id": Uuid::new_v4(),
                "hospital_id": Uuid::new_v4(),
                "appointment_date": "2025-06-10T10:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_doctor_patients_deduplicates_in_first_seen_order() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let doctor_id = Uuid::new_v4().to_string();
    let patient_a = Uuid::new_v4().to_string();
    let patient_b = Uuid::new_v4().to_string();
    let token =
        JwtTestUtils::create_test_token(&TestUser::doctor(), &config.jwt_secret, None);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(query_param("select", "patient_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "patient_id": patient_a },
            { "patient_id": patient_b },
            { "patient_id": patient_a },
            { "patient_id": patient_b }
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/doctor/{}/patients", doctor_id))
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body, json!([patient_a, patient_b]));
}

#[tokio::test]
async fn test_patient_appointments_empty_is_not_found() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let patient = TestUser::patient();
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("patient_id", format!("eq.{}", patient.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/patient/{}", patient.id))
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], "No appointments found for this patient");
}

#[tokio::test]
async fn test_doctor_appointments_empty_is_ok() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let doctor = TestUser::doctor();
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/doctor/{}", doctor.id))
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_delete_appointment_reports_missing_row() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let token =
        JwtTestUtils::create_test_token(&TestUser::patient(), &config.jwt_secret, None);
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", id))
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Appointment not found");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let patient = TestUser::patient();
    let token = JwtTestUtils::create_expired_token(&patient, &config.jwt_secret);

    let app = create_test_app(config.to_app_config()).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
