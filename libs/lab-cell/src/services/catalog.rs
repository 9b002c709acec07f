// libs/lab-cell/src/services/catalog.rs
use reqwest::Method;
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::StoreClient;

use crate::error::LabError;
use crate::models::{CreateLabTestRequest, LabTest};

pub struct CatalogService {
    store: StoreClient,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    pub async fn create(
        &self,
        request: CreateLabTestRequest,
        auth_token: &str,
    ) -> Result<LabTest, LabError> {
        let test = self
            .store
            .insert_returning(
                "/rest/v1/lab_tests",
                Some(auth_token),
                json!({
                    "name": request.name,
                    "description": request.description,
                    "cost": request.cost,
                    "is_active": request.is_active,
                }),
            )
            .await?;
        Ok(test)
    }

    /// Only active tests are offered to consultations.
    pub async fn list_active(&self, auth_token: &str) -> Result<Vec<LabTest>, LabError> {
        let tests = self
            .store
            .request(
                Method::GET,
                "/rest/v1/lab_tests?is_active=eq.true",
                Some(auth_token),
                None,
            )
            .await?;
        Ok(tests)
    }

    pub async fn get(&self, id: Uuid, auth_token: &str) -> Result<LabTest, LabError> {
        let path = format!("/rest/v1/lab_tests?id=eq.{}", id);
        let mut rows: Vec<LabTest> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if rows.is_empty() {
            return Err(LabError::CatalogNotFound);
        }
        Ok(rows.remove(0))
    }

    /// Batch lookup used by billing to price a consultation's tests. Ids
    /// that are unknown or inactive are simply absent from the result.
    pub async fn get_by_ids(
        &self,
        ids: &[Uuid],
        auth_token: &str,
    ) -> Result<Vec<LabTest>, LabError> {
        if ids.is_empty() {
            return Err(LabError::EmptyIdList);
        }

        let id_list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let path = format!(
            "/rest/v1/lab_tests?id=in.({})&is_active=eq.true",
            id_list
        );

        let tests = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;
        Ok(tests)
    }
}
