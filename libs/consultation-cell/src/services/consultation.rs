// libs/consultation-cell/src/services/consultation.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::{StoreClient, StoreError};

use crate::error::ConsultationError;
use crate::models::{Consultation, CreateConsultationRequest, UpdateConsultationRequest};
use crate::services::lab_client::LabClient;

pub struct ConsultationService {
    store: StoreClient,
    lab: LabClient,
}

impl ConsultationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
            lab: LabClient::new(config),
        }
    }

    /// Persist the consultation, then propagate a lab order for its test
    /// list. A failed propagation leaves the consultation committed with no
    /// lab order behind it; the gap is logged and surfaces later when
    /// billing looks the order up.
    pub async fn create(
        &self,
        doctor_id: Uuid,
        request: CreateConsultationRequest,
        auth_token: &str,
    ) -> Result<Consultation, ConsultationError> {
        info!(
            "Creating consultation for appointment {} by doctor {}",
            request.appointment_id, doctor_id
        );

        let consultation: Consultation = self
            .store
            .insert_returning(
                "/rest/v1/consultations",
                Some(auth_token),
                json!({
                    "patient_id": request.patient_id,
                    "doctor_id": doctor_id,
                    "nurse_id": request.nurse_id,
                    "appointment_id": request.appointment_id,
                    "vitals": request.vitals,
                    "diagnosis": request.diagnosis,
                    "prescription": request.prescription,
                    "lab_tests": request.lab_tests,
                    "created_at": Utc::now(),
                }),
            )
            .await?;

        if let Err(e) = self
            .lab
            .create_lab_order(
                consultation.patient_id,
                consultation.appointment_id,
                doctor_id,
                &consultation.lab_tests,
                auth_token,
            )
            .await
        {
            warn!(
                "Lab order propagation for appointment {} failed: {}",
                consultation.appointment_id, e
            );
        }

        Ok(consultation)
    }

    /// Update the consultation row, then sync the lab order when the test
    /// list was touched. The row is updated before the lab call, so a lab
    /// failure reports 400 while the new list is already stored.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateConsultationRequest,
        auth_token: &str,
    ) -> Result<Consultation, ConsultationError> {
        let existing = self.get(id, auth_token).await?;

        let path = format!("/rest/v1/consultations?id=eq.{}", id);
        let body = serde_json::to_value(&request)
            .map_err(|e| ConsultationError::Database(StoreError::Decode(e.to_string())))?;

        let updated: Consultation = self
            .store
            .patch_returning(&path, Some(auth_token), body)
            .await?;

        if let Some(lab_tests) = &request.lab_tests {
            let added: Vec<Uuid> = lab_tests
                .iter()
                .copied()
                .filter(|t| !existing.lab_tests.contains(t))
                .collect();

            if !added.is_empty() {
                self.lab
                    .create_lab_order(
                        updated.patient_id,
                        updated.appointment_id,
                        updated.doctor_id,
                        &added,
                        auth_token,
                    )
                    .await
                    .map_err(|e| {
                        warn!("Lab order create during update failed: {}", e);
                        ConsultationError::LabUpdateFailed
                    })?;
            }

            self.lab
                .put_order_by_appointment(updated.appointment_id, lab_tests, auth_token)
                .await
                .map_err(|e| {
                    warn!("Lab order sync during update failed: {}", e);
                    ConsultationError::LabUpdateFailed
                })?;
        }

        Ok(updated)
    }

    /// Delete the consultation and its lab order. The order is keyed by the
    /// appointment, so the row must be read before it is removed.
    pub async fn delete(&self, id: Uuid, auth_token: &str) -> Result<(), ConsultationError> {
        let existing = self.get(id, auth_token).await?;

        let path = format!("/rest/v1/consultations?id=eq.{}", id);
        let _: Vec<serde_json::Value> = self
            .store
            .request(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        self.lab
            .delete_order_by_appointment(existing.appointment_id, auth_token)
            .await
            .map_err(|e| ConsultationError::Cascade(e.to_string()))?;

        info!("Consultation {} deleted", id);
        Ok(())
    }

    pub async fn get(&self, id: Uuid, auth_token: &str) -> Result<Consultation, ConsultationError> {
        let path = format!("/rest/v1/consultations?id=eq.{}", id);
        let mut rows: Vec<Consultation> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if rows.is_empty() {
            return Err(ConsultationError::NotFound);
        }
        Ok(rows.remove(0))
    }

    pub async fn list_all(&self, auth_token: &str) -> Result<Vec<Consultation>, ConsultationError> {
        let consultations = self
            .store
            .request(Method::GET, "/rest/v1/consultations", Some(auth_token), None)
            .await?;
        Ok(consultations)
    }

    /// The single consultation attached to an appointment. Billing depends
    /// on this lookup.
    pub async fn get_by_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Consultation, ConsultationError> {
        let path = format!(
            "/rest/v1/consultations?appointment_id=eq.{}",
            appointment_id
        );
        let mut rows: Vec<Consultation> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if rows.is_empty() {
            return Err(ConsultationError::NotFound);
        }
        Ok(rows.remove(0))
    }

    pub async fn list_for_patient(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Consultation>, ConsultationError> {
        let path = format!("/rest/v1/consultations?patient_id=eq.{}", patient_id);
        let consultations = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;
        Ok(consultations)
    }
}
