use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::Role;

pub struct TestConfig {
    pub jwt_secret: String,
    pub store_url: String,
    pub store_api_key: String,
    pub directory_url: String,
    pub service_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            store_url: "http://localhost:54321".to_string(),
            store_api_key: "test-api-key".to_string(),
            directory_url: "http://localhost:3000/api".to_string(),
            service_url: "http://localhost:3000/api".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the store and every upstream service at a single mock server.
    pub fn with_mock_server(url: &str) -> Self {
        Self {
            store_url: url.to_string(),
            directory_url: format!("{}/api", url),
            service_url: format!("{}/api", url),
            ..Default::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_api_key: self.store_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            doctor_service_url: format!("{}/doctor", self.directory_url),
            nurse_service_url: format!("{}/nurse", self.directory_url),
            appointment_service_url: format!("{}/appointment", self.service_url),
            consultation_service_url: format!("{}/consultations", self.service_url),
            lab_service_url: format!("{}/labs", self.service_url),
            lab_test_service_url: format!("{}/lab-tests", self.service_url),
            consultation_fee: 500.0,
            http_timeout_secs: 5,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub role: Role,
    pub hospital_id: Option<String>,
}

impl TestUser {
    pub fn new(role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            hospital_id: None,
        }
    }

    pub fn hospital_admin(hospital_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::HospitalAdmin,
            hospital_id: Some(hospital_id.to_string()),
        }
    }

    pub fn doctor() -> Self {
        Self::new(Role::Doctor)
    }

    pub fn nurse() -> Self {
        Self::new(Role::Nurse)
    }

    pub fn patient() -> Self {
        Self::new(Role::Patient)
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "id": user.id,
            "role": user.role,
            "hospitalId": user.hospital_id,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn schedule_response(
        id: &str,
        hospital_id: &str,
        assigned_to: &str,
        role: &str,
        date: &str,
        time_slot: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "hospital_id": hospital_id,
            "assigned_to": assigned_to,
            "role": role,
            "date": date,
            "time_slot": time_slot,
            "created_at": "2025-06-01T00:00:00Z",
            "updated_at": "2025-06-01T00:00:00Z"
        })
    }

    pub fn staff_profile_response(
        id: &str,
        name: &str,
        leave_dates: &[&str],
        scheduled_dates: &[&str],
    ) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            "specialization": "General Medicine",
            "department": "General",
            "available": true,
            "leaveDates": leave_dates
                .iter()
                .map(|d| format!("{}T00:00:00Z", d))
                .collect::<Vec<_>>(),
            "scheduledDates": scheduled_dates
        })
    }

    pub fn appointment_response(
        id: &str,
        patient_id: &str,
        doctor_id: &str,
        appointment_date: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "department_id": Uuid::new_v4(),
            "hospital_id": Uuid::new_v4(),
            "appointment_date": appointment_date,
            "status": "SCHEDULED",
            "created_at": "2025-06-01T00:00:00Z"
        })
    }

    pub fn consultation_response(
        id: &str,
        patient_id: &str,
        doctor_id: &str,
        appointment_id: &str,
        lab_tests: &[&str],
    ) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "nurse_id": null,
            "appointment_id": appointment_id,
            "vitals": null,
            "diagnosis": "Routine checkup",
            "prescription": [],
            "lab_tests": lab_tests,
            "created_at": "2025-06-01T00:00:00Z"
        })
    }

    pub fn lab_order_response(
        id: &str,
        patient_id: &str,
        appointment_id: &str,
        ordered_by: &str,
        test_details: serde_json::Value,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "appointment_id": appointment_id,
            "ordered_by": ordered_by,
            "test_details": test_details,
            "created_at": "2025-06-01T00:00:00Z",
            "updated_at": "2025-06-01T00:00:00Z"
        })
    }

    pub fn lab_test_response(id: &str, name: &str, cost: f64) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": null,
            "cost": cost,
            "is_active": true
        })
    }

    pub fn billing_response(
        id: &str,
        patient_id: &str,
        appointment_id: &str,
        hospital_id: &str,
        lab_tests: serde_json::Value,
        total_amount: f64,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "appointment_id": appointment_id,
            "hospital_id": hospital_id,
            "consultation_fee": 500.0,
            "lab_tests": lab_tests,
            "total_amount": total_amount,
            "status": "unpaid",
            "payment_details": null,
            "created_at": "2025-06-01T00:00:00Z",
            "updated_at": "2025-06-01T00:00:00Z"
        })
    }
}
