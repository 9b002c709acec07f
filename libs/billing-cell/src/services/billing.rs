// libs/billing-cell/src/services/billing.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::StoreClient;

use crate::error::BillingError;
use crate::models::{Billing, BillingLineItem, BillingStatus, UpstreamLabTest};
use crate::services::clients::UpstreamClients;

const COMPLETED: &str = "completed";

/// Result of an append-only lab-charge recompute.
pub enum LabChargesOutcome {
    NoNewTests(Billing),
    Updated(Billing),
}

pub struct BillingService {
    store: StoreClient,
    clients: UpstreamClients,
    consultation_fee: f64,
}

impl BillingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
            clients: UpstreamClients::new(config),
            consultation_fee: config.consultation_fee,
        }
    }

    /// Create the bill for an appointment. The upstream fetches run in a
    /// fixed order and the first missing piece aborts with 404; a bill is
    /// only written once every ordered test is completed.
    pub async fn create_bill(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Billing, BillingError> {
        let appointment = self
            .clients
            .get_appointment(appointment_id, auth_token)
            .await?
            .ok_or(BillingError::AppointmentNotFound)?;

        let consultation = self
            .clients
            .get_consultation_by_appointment(appointment_id, auth_token)
            .await?
            .ok_or(BillingError::ConsultationNotFound)?;

        let lab_order = self
            .clients
            .get_lab_by_appointment(appointment_id, auth_token)
            .await?
            .ok_or(BillingError::LabRecordNotFound)?;

        let pending_ids: Vec<Uuid> = lab_order
            .test_details
            .iter()
            .filter(|d| d.status != COMPLETED)
            .map(|d| d.test_id)
            .collect();

        if !pending_ids.is_empty() {
            let names = self.resolve_test_names(&pending_ids, auth_token).await;
            return Err(BillingError::PendingTests(names));
        }

        let mut line_items = Vec::new();
        let mut lab_total = 0.0;
        if !consultation.lab_tests.is_empty() {
            let tests = self
                .clients
                .get_lab_tests_by_ids(&consultation.lab_tests, auth_token)
                .await?;
            lab_total = tests.iter().map(|t| t.cost).sum();
            line_items = tests.into_iter().map(line_item).collect::<Vec<_>>();
        }

        let total_amount = self.consultation_fee + lab_total;
        let now = Utc::now();

        let billing: Billing = self
            .store
            .insert_returning(
                "/rest/v1/billing",
                Some(auth_token),
                json!({
                    "patient_id": appointment.patient_id,
                    "appointment_id": appointment.id,
                    "hospital_id": appointment.hospital_id,
                    "consultation_fee": self.consultation_fee,
                    "lab_tests": line_items,
                    "total_amount": total_amount,
                    "status": BillingStatus::Unpaid,
                    "created_at": now,
                    "updated_at": now,
                }),
            )
            .await?;

        info!(
            "Bill {} created for appointment {} totalling {}",
            billing.id, appointment_id, billing.total_amount
        );
        Ok(billing)
    }

    /// Append charges for tests added to the consultation after the bill
    /// was cut. Existing line items are never removed or repriced, so the
    /// total only ever grows here.
    pub async fn update_lab_charges(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<LabChargesOutcome, BillingError> {
        let billing = self.get_by_appointment_inner(appointment_id, auth_token).await?;
        let billing = billing.ok_or(BillingError::BillingRecordNotFound)?;

        let consultation = self
            .clients
            .get_consultation_by_appointment(appointment_id, auth_token)
            .await?
            .ok_or(BillingError::ConsultationNotFound)?;

        let new_ids: Vec<Uuid> = consultation
            .lab_tests
            .iter()
            .copied()
            .filter(|id| !billing.lab_tests.iter().any(|t| t.lab_test_id == *id))
            .collect();

        if new_ids.is_empty() {
            return Ok(LabChargesOutcome::NoNewTests(billing));
        }

        let new_tests = self
            .clients
            .get_lab_tests_by_ids(&new_ids, auth_token)
            .await?;
        let added_total: f64 = new_tests.iter().map(|t| t.cost).sum();

        let mut lab_tests = billing.lab_tests.clone();
        lab_tests.extend(new_tests.into_iter().map(line_item));

        let path = format!("/rest/v1/billing?appointment_id=eq.{}", appointment_id);
        let updated: Billing = self
            .store
            .patch_returning(
                &path,
                Some(auth_token),
                json!({
                    "lab_tests": lab_tests,
                    "total_amount": billing.total_amount + added_total,
                    "updated_at": Utc::now(),
                }),
            )
            .await?;

        info!(
            "Bill {} extended with {} lab tests, new total {}",
            updated.id, new_ids.len(), updated.total_amount
        );
        Ok(LabChargesOutcome::Updated(updated))
    }

    pub async fn get_by_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Billing, BillingError> {
        self.get_by_appointment_inner(appointment_id, auth_token)
            .await?
            .ok_or(BillingError::BillNotFound)
    }

    pub async fn get(&self, id: Uuid, auth_token: &str) -> Result<Billing, BillingError> {
        let path = format!("/rest/v1/billing?id=eq.{}", id);
        let mut rows: Vec<Billing> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if rows.is_empty() {
            return Err(BillingError::BillingRecordNotFound);
        }
        Ok(rows.remove(0))
    }

    pub async fn list_for_patient(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Billing>, BillingError> {
        let path = format!("/rest/v1/billing?patient_id=eq.{}", patient_id);
        let bills = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;
        Ok(bills)
    }

    pub async fn list_all(&self, auth_token: &str) -> Result<Vec<Billing>, BillingError> {
        let bills = self
            .store
            .request(Method::GET, "/rest/v1/billing", Some(auth_token), None)
            .await?;
        Ok(bills)
    }

    async fn get_by_appointment_inner(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<Billing>, BillingError> {
        let path = format!("/rest/v1/billing?appointment_id=eq.{}", appointment_id);
        let mut rows: Vec<Billing> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.remove(0)))
    }

    /// Human-readable names for the gate payload. When the catalog cannot
    /// be reached the raw ids stand in; the gate still fires either way.
    async fn resolve_test_names(&self, ids: &[Uuid], auth_token: &str) -> Vec<String> {
        match self.clients.get_lab_tests_by_ids(ids, auth_token).await {
            Ok(tests) => ids
                .iter()
                .map(|id| {
                    tests
                        .iter()
                        .find(|t| t.id == *id)
                        .map(|t| t.name.clone())
                        .unwrap_or_else(|| id.to_string())
                })
                .collect(),
            Err(e) => {
                warn!("Could not resolve pending test names: {}", e);
                ids.iter().map(|id| id.to_string()).collect()
            }
        }
    }
}

fn line_item(test: UpstreamLabTest) -> BillingLineItem {
    BillingLineItem {
        lab_test_id: test.id,
        test_name: test.name,
        cost: test.cost,
    }
}
