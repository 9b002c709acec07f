// libs/lab-cell/src/services/orders.rs
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::StoreClient;

use crate::error::LabError;
use crate::models::{
    CreateLabOrderRequest, LabOrder, TestDetail, UpdateLabOrderRequest, UpdateTestStatusRequest,
};

pub struct LabOrderService {
    store: StoreClient,
}

impl LabOrderService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Create the order for an appointment, one pending detail per test.
    pub async fn create(
        &self,
        request: CreateLabOrderRequest,
        auth_token: &str,
    ) -> Result<LabOrder, LabError> {
        let details: Vec<TestDetail> = request
            .lab_tests
            .iter()
            .map(|&test_id| TestDetail::pending(test_id))
            .collect();

        let now = Utc::now();
        let order: LabOrder = self
            .store
            .insert_returning(
                "/rest/v1/lab_orders",
                Some(auth_token),
                json!({
                    "patient_id": request.patient_id,
                    "appointment_id": request.appointment_id,
                    "ordered_by": request.ordered_by,
                    "test_details": details,
                    "created_at": now,
                    "updated_at": now,
                }),
            )
            .await?;

        info!(
            "Lab order {} created for appointment {} with {} tests",
            order.id,
            order.appointment_id,
            order.test_details.len()
        );
        Ok(order)
    }

    pub async fn list_all(&self, auth_token: &str) -> Result<Vec<LabOrder>, LabError> {
        let orders = self
            .store
            .request(Method::GET, "/rest/v1/lab_orders", Some(auth_token), None)
            .await?;
        Ok(orders)
    }

    pub async fn get(&self, id: Uuid, auth_token: &str) -> Result<LabOrder, LabError> {
        let path = format!("/rest/v1/lab_orders?id=eq.{}", id);
        let mut rows: Vec<LabOrder> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if rows.is_empty() {
            return Err(LabError::NotFound);
        }
        Ok(rows.remove(0))
    }

    pub async fn get_by_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<LabOrder, LabError> {
        let path = format!("/rest/v1/lab_orders?appointment_id=eq.{}", appointment_id);
        let mut rows: Vec<LabOrder> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if rows.is_empty() {
            return Err(LabError::NotFoundForAppointment);
        }
        Ok(rows.remove(0))
    }

    /// Replace the order's test list wholesale. Progress already recorded on
    /// the old details is discarded with them.
    pub async fn update_by_appointment(
        &self,
        appointment_id: Uuid,
        request: UpdateLabOrderRequest,
        auth_token: &str,
    ) -> Result<LabOrder, LabError> {
        self.get_by_appointment(appointment_id, auth_token).await?;

        let details: Vec<TestDetail> = request
            .lab_tests
            .iter()
            .map(|&test_id| TestDetail::pending(test_id))
            .collect();

        let path = format!("/rest/v1/lab_orders?appointment_id=eq.{}", appointment_id);
        let order = self
            .store
            .patch_returning(
                &path,
                Some(auth_token),
                json!({
                    "test_details": details,
                    "updated_at": Utc::now(),
                }),
            )
            .await?;
        Ok(order)
    }

    pub async fn delete_by_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<(), LabError> {
        let path = format!("/rest/v1/lab_orders?appointment_id=eq.{}", appointment_id);

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let deleted: Vec<LabOrder> = self
            .store
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await?;

        if deleted.is_empty() {
            return Err(LabError::NotFound);
        }
        Ok(())
    }

    /// Advance one test's status. Backward moves are rejected so a completed
    /// test stays completed once billing has seen it.
    pub async fn update_test_status(
        &self,
        appointment_id: Uuid,
        detail_id: Uuid,
        request: UpdateTestStatusRequest,
        auth_token: &str,
    ) -> Result<LabOrder, LabError> {
        let mut order = self.get_by_appointment(appointment_id, auth_token).await?;

        let detail = order
            .test_details
            .iter_mut()
            .find(|d| d.id == detail_id)
            .ok_or(LabError::TestNotFound)?;

        if !detail.status.can_transition_to(request.status) {
            return Err(LabError::InvalidTransition {
                from: detail.status,
                to: request.status,
            });
        }

        detail.status = request.status;
        if let Some(url) = request.result_file_url {
            detail.result_file_url = Some(url);
        }
        if let Some(remarks) = request.remarks {
            detail.remarks = Some(remarks);
        }

        let path = format!("/rest/v1/lab_orders?appointment_id=eq.{}", appointment_id);
        let updated = self
            .store
            .patch_returning(
                &path,
                Some(auth_token),
                json!({
                    "test_details": order.test_details,
                    "updated_at": Utc::now(),
                }),
            )
            .await?;
        Ok(updated)
    }

    /// Orders that still have at least one pending test.
    pub async fn list_pending(&self, auth_token: &str) -> Result<Vec<LabOrder>, LabError> {
        let orders = self.list_all(auth_token).await?;
        Ok(orders.into_iter().filter(|o| o.has_pending_work()).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::TestStatus;

    #[test]
    fn status_moves_forward_only() {
        assert!(TestStatus::Pending.can_transition_to(TestStatus::InProgress));
        assert!(TestStatus::Pending.can_transition_to(TestStatus::Completed));
        assert!(TestStatus::InProgress.can_transition_to(TestStatus::Completed));

        assert!(!TestStatus::Completed.can_transition_to(TestStatus::InProgress));
        assert!(!TestStatus::Completed.can_transition_to(TestStatus::Pending));
        assert!(!TestStatus::InProgress.can_transition_to(TestStatus::Pending));
        assert!(!TestStatus::Pending.can_transition_to(TestStatus::Pending));
    }
}
