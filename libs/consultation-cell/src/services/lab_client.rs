// libs/consultation-cell/src/services/lab_client.rs
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;

/// Client for the lab cell. Every lab order is keyed by appointment id, so
/// the update and delete calls address orders that way rather than by the
/// order's own id.
pub struct LabClient {
    client: Client,
    lab_base: String,
}

#[derive(Debug, thiserror::Error)]
#[error("lab service call failed: {0}")]
pub struct LabClientError(String);

impl LabClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            lab_base: config.lab_service_url.clone(),
        }
    }

    /// Create a lab order for the appointment, one pending test per id.
    /// No-op when the consultation ordered no tests.
    pub async fn create_lab_order(
        &self,
        patient_id: Uuid,
        appointment_id: Uuid,
        ordered_by: Uuid,
        lab_tests: &[Uuid],
        auth_token: &str,
    ) -> Result<(), LabClientError> {
        if lab_tests.is_empty() {
            return Ok(());
        }

        debug!(
            "Creating lab order for appointment {} with {} tests",
            appointment_id,
            lab_tests.len()
        );

        let response = self
            .client
            .post(&self.lab_base)
            .bearer_auth(auth_token)
            .json(&json!({
                "patient_id": patient_id,
                "appointment_id": appointment_id,
                "ordered_by": ordered_by,
                "lab_tests": lab_tests,
            }))
            .send()
            .await
            .map_err(|e| LabClientError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LabClientError(format!(
                "order create returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Replace the order's test list with the supplied one. The lab cell
    /// resets every detail to pending, dropping any recorded progress.
    pub async fn put_order_by_appointment(
        &self,
        appointment_id: Uuid,
        lab_tests: &[Uuid],
        auth_token: &str,
    ) -> Result<(), LabClientError> {
        let url = format!("{}/by-appointment/{}", self.lab_base, appointment_id);
        let response = self
            .client
            .put(&url)
            .bearer_auth(auth_token)
            .json(&json!({ "lab_tests": lab_tests }))
            .send()
            .await
            .map_err(|e| LabClientError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LabClientError(format!(
                "order update returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    pub async fn delete_order_by_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<(), LabClientError> {
        let url = format!("{}/by-appointment/{}", self.lab_base, appointment_id);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(auth_token)
            .send()
            .await
            .map_err(|e| LabClientError(e.to_string()))?;

        // A missing order is fine here: consultations without lab tests
        // never created one.
        if !response.status().is_success() && response.status().as_u16() != 404 {
            return Err(LabClientError(format!(
                "order delete returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
