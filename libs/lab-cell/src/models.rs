// libs/lab-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TestStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl TestStatus {
    /// Status only moves forward. Re-opening a completed test means
    /// replacing the whole order via the consultation update path.
    pub fn can_transition_to(self, next: TestStatus) -> bool {
        next > self
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TestStatus::Pending => "pending",
            TestStatus::InProgress => "in-progress",
            TestStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// Execution state of one ordered test. `test_id` points at the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDetail {
    pub id: Uuid,
    pub test_id: Uuid,
    pub status: TestStatus,
    pub result_file_url: Option<String>,
    pub remarks: Option<String>,
}

impl TestDetail {
    pub fn pending(test_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            test_id,
            status: TestStatus::Pending,
            result_file_url: None,
            remarks: None,
        }
    }
}

/// The lab work ordered for one appointment. At most one order exists per
/// appointment; the consultation cell creates, replaces and deletes it
/// through the by-appointment routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabOrder {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub appointment_id: Uuid,
    pub ordered_by: Uuid,
    pub test_details: Vec<TestDetail>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LabOrder {
    pub fn has_pending_work(&self) -> bool {
        self.test_details
            .iter()
            .any(|d| d.status == TestStatus::Pending)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLabOrderRequest {
    pub patient_id: Uuid,
    pub appointment_id: Uuid,
    pub ordered_by: Uuid,
    #[serde(default)]
    pub lab_tests: Vec<Uuid>,
}

/// Full replacement of the order's test list. Every detail restarts as
/// pending, including tests that were already in the order.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLabOrderRequest {
    pub lab_tests: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTestStatusRequest {
    pub status: TestStatus,
    pub result_file_url: Option<String>,
    pub remarks: Option<String>,
}

/// Catalog entry for an orderable test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabTest {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub cost: f64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLabTestRequest {
    pub name: String,
    pub description: Option<String>,
    pub cost: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabTestIdsRequest {
    pub ids: Vec<Uuid>,
}
