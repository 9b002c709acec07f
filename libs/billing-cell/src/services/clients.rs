// libs/billing-cell/src/services/clients.rs
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;

use crate::error::BillingError;
use crate::models::{UpstreamAppointment, UpstreamConsultation, UpstreamLabOrder, UpstreamLabTest};

/// Read-side clients for the cells billing depends on. Calls are made
/// sequentially by the service so each gate can short-circuit.
pub struct UpstreamClients {
    client: Client,
    appointment_base: String,
    consultation_base: String,
    lab_base: String,
    lab_test_base: String,
}

impl UpstreamClients {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            appointment_base: config.appointment_service_url.clone(),
            consultation_base: config.consultation_service_url.clone(),
            lab_base: config.lab_service_url.clone(),
            lab_test_base: config.lab_test_service_url.clone(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        auth_token: &str,
    ) -> Result<Option<T>, BillingError> {
        debug!("Upstream fetch: {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(auth_token)
            .send()
            .await
            .map_err(|e| BillingError::Upstream(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(BillingError::Upstream(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let value = response
            .json::<T>()
            .await
            .map_err(|e| BillingError::Upstream(e.to_string()))?;
        Ok(Some(value))
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<UpstreamAppointment>, BillingError> {
        let url = format!("{}/{}", self.appointment_base, appointment_id);
        self.get_json(&url, auth_token).await
    }

    pub async fn get_consultation_by_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<UpstreamConsultation>, BillingError> {
        let url = format!("{}/appointment/{}", self.consultation_base, appointment_id);
        self.get_json(&url, auth_token).await
    }

    pub async fn get_lab_by_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<UpstreamLabOrder>, BillingError> {
        let url = format!("{}/by-appointment/{}", self.lab_base, appointment_id);
        self.get_json(&url, auth_token).await
    }

    /// Price lookup for a set of catalog test ids.
    pub async fn get_lab_tests_by_ids(
        &self,
        ids: &[Uuid],
        auth_token: &str,
    ) -> Result<Vec<UpstreamLabTest>, BillingError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/by-ids", self.lab_test_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(auth_token)
            .json(&json!({ "ids": ids }))
            .send()
            .await
            .map_err(|e| BillingError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BillingError::Upstream(format!(
                "catalog lookup returned {}",
                response.status()
            )));
        }

        response
            .json::<Vec<UpstreamLabTest>>()
            .await
            .map_err(|e| BillingError::Upstream(e.to_string()))
    }
}
