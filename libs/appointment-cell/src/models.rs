// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// A patient's booking with a doctor at an exact point in time. The store
/// keeps a compound unique index over (patient_id, doctor_id,
/// appointment_date), so the same patient cannot hold two bookings with the
/// same doctor at the same instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub department_id: Uuid,
    pub hospital_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub department_id: Uuid,
    pub hospital_id: Uuid,
    pub appointment_date: DateTime<Utc>,
}

/// Partial update. Absent fields are left untouched by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
}

/// Projection used when only the patient column is selected.
#[derive(Debug, Deserialize)]
pub struct PatientRef {
    pub patient_id: Uuid,
}
