// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE SCHEDULE MODELS
// ==============================================================================

/// A staff assignment for a single calendar day and time slot, owned by the
/// hospital tenant. Assignments are never edited in place; the store enforces
/// uniqueness over (hospital_id, assigned_to, date, time_slot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub assigned_to: Uuid,
    pub role: StaffRole,
    pub date: NaiveDate,
    pub time_slot: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Doctor,
    Nurse,
    Staff,
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffRole::Doctor => write!(f, "DOCTOR"),
            StaffRole::Nurse => write!(f, "NURSE"),
            StaffRole::Staff => write!(f, "STAFF"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignScheduleRequest {
    pub assigned_to: Uuid,
    pub role: StaffRole,
    pub date: NaiveDate,
    #[serde(default = "default_time_slot")]
    pub time_slot: String,
}

fn default_time_slot() -> String {
    "full-day".to_string()
}

/// An assignment joined with the assignee's current directory record.
/// Directory lookups degrade to placeholder values instead of failing the
/// whole listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedAssignment {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub role: StaffRole,
    pub date: NaiveDate,
    pub time_slot: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assigned_to: AssigneeDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssigneeDetail {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl AssigneeDetail {
    /// Placeholder used when the owning directory service cannot be reached.
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            name: "Unknown".to_string(),
            email: String::new(),
            specialization: None,
            department: None,
        }
    }
}

// ==============================================================================
// DIRECTORY SERVICE MODELS (external collaborator data)
// ==============================================================================

/// Staff record as served by the doctor/nurse registries. Leave dates arrive
/// as full timestamps; comparisons are by calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub leave_dates: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_dates: Vec<Uuid>,
}

impl StaffProfile {
    pub fn is_on_leave(&self, date: NaiveDate) -> bool {
        self.leave_dates.iter().any(|d| d.date_naive() == date)
    }

    pub fn has_schedule_ref(&self, schedule_id: Uuid) -> bool {
        self.scheduled_dates.contains(&schedule_id)
    }
}
