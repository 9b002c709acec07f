// libs/billing-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingStatus {
    Unpaid,
    Paid,
}

/// One priced lab test on a bill. The name and cost are frozen at billing
/// time; later catalog edits do not reprice existing bills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingLineItem {
    pub lab_test_id: Uuid,
    pub test_name: String,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub method: Option<String>,
    pub transaction_id: Option<String>,
    pub paid_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Billing {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub appointment_id: Uuid,
    pub hospital_id: Uuid,
    pub consultation_fee: f64,
    #[serde(default)]
    pub lab_tests: Vec<BillingLineItem>,
    pub total_amount: f64,
    pub status: BillingStatus,
    pub payment_details: Option<PaymentDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBillRequest {
    pub appointment_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLabChargesRequest {
    pub appointment_id: Uuid,
}

// Read models for the upstream cells. Only the fields billing needs are
// deserialized.

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamAppointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub hospital_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConsultation {
    #[serde(default)]
    pub lab_tests: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamTestDetail {
    pub test_id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamLabOrder {
    #[serde(default)]
    pub test_details: Vec<UpstreamTestDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamLabTest {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub cost: f64,
}
