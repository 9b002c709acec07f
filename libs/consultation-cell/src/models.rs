// libs/consultation-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionItem {
    pub medicine_name: String,
    pub days: u32,
    pub times_per_day: u32,
    pub before_or_after_food: String,
}

/// A doctor's write-up for one appointment. `lab_tests` holds catalog test
/// ids; the lab cell owns the per-test execution state in its own order
/// record, created from this list on consultation create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub nurse_id: Option<Uuid>,
    pub appointment_id: Uuid,
    pub vitals: Option<Vitals>,
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub prescription: Vec<PrescriptionItem>,
    #[serde(default)]
    pub lab_tests: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConsultationRequest {
    pub patient_id: Uuid,
    pub appointment_id: Uuid,
    pub nurse_id: Option<Uuid>,
    pub vitals: Option<Vitals>,
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub prescription: Vec<PrescriptionItem>,
    #[serde(default)]
    pub lab_tests: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConsultationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitals: Option<Vitals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<Vec<PrescriptionItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_tests: Option<Vec<Uuid>>,
}
