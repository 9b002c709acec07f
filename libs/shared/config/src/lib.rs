use std::env;
use tracing::warn;

/// Environment-driven configuration shared by every cell.
///
/// The defaults are for local development only and must never be relied on
/// in a deployed environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub jwt_secret: String,
    pub doctor_service_url: String,
    pub nurse_service_url: String,
    pub appointment_service_url: String,
    pub consultation_service_url: String,
    pub lab_service_url: String,
    pub lab_test_service_url: String,
    pub consultation_fee: f64,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("STORE_URL").unwrap_or_else(|_| {
                warn!("STORE_URL not set, using empty value");
                String::new()
            }),
            store_api_key: env::var("STORE_API_KEY").unwrap_or_else(|_| {
                warn!("STORE_API_KEY not set, using empty value");
                String::new()
            }),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                warn!("JWT_SECRET not set, using insecure default");
                "supersecretkey".to_string()
            }),
            doctor_service_url: env::var("DOCTOR_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/doctor".to_string()),
            nurse_service_url: env::var("NURSE_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/nurse".to_string()),
            appointment_service_url: env::var("APPOINTMENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/appointment".to_string()),
            consultation_service_url: env::var("CONSULTATION_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/consultations".to_string()),
            lab_service_url: env::var("LAB_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/labs".to_string()),
            lab_test_service_url: env::var("LAB_TEST_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/lab-tests".to_string()),
            consultation_fee: env::var("CONSULTATION_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500.0),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty()
            && !self.store_api_key.is_empty()
            && !self.jwt_secret.is_empty()
    }
}
