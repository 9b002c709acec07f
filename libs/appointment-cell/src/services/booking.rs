// libs/appointment-cell/src/services/booking.rs
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::{StoreClient, StoreError};

use crate::error::AppointmentError;
use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, PatientRef, UpdateAppointmentRequest,
};

pub struct BookingService {
    store: StoreClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Book an appointment for the authenticated patient. Duplicate detection
    /// is delegated to the store's compound unique index; a conflicting
    /// insert surfaces as `Duplicate` without a prior existence read.
    pub async fn book(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking attempt by patient {} with doctor {} at {}",
            patient_id, request.doctor_id, request.appointment_date
        );

        let appointment: Appointment = self
            .store
            .insert_returning(
                "/rest/v1/appointments",
                Some(auth_token),
                json!({
                    "patient_id": patient_id,
                    "doctor_id": request.doctor_id,
                    "department_id": request.department_id,
                    "hospital_id": request.hospital_id,
                    "appointment_date": request.appointment_date,
                    "status": AppointmentStatus::Scheduled,
                    "created_at": Utc::now(),
                }),
            )
            .await?;

        info!("Appointment {} booked", appointment.id);
        Ok(appointment)
    }

    pub async fn list_all(&self, auth_token: &str) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self
            .store
            .request(Method::GET, "/rest/v1/appointments", Some(auth_token), None)
            .await?;
        Ok(appointments)
    }

    pub async fn get(&self, id: Uuid, auth_token: &str) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let mut rows: Vec<Appointment> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if rows.is_empty() {
            return Err(AppointmentError::NotFound);
        }
        Ok(rows.remove(0))
    }

    /// A patient's own bookings. An empty result is reported as not-found.
    pub async fn list_for_patient(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!("/rest/v1/appointments?patient_id=eq.{}", patient_id);
        let appointments: Vec<Appointment> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if appointments.is_empty() {
            return Err(AppointmentError::NoneForPatient);
        }
        Ok(appointments)
    }

    /// A doctor's bookings. Unlike the patient listing this returns an empty
    /// list when nothing matches; callers iterate it.
    pub async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!("/rest/v1/appointments?doctor_id=eq.{}", doctor_id);
        let appointments = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;
        Ok(appointments)
    }

    /// Distinct patient ids that have ever booked with the doctor, in order
    /// of first appearance.
    pub async fn patients_for_doctor(
        &self,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Uuid>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&select=patient_id",
            doctor_id
        );
        let refs: Vec<PatientRef> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let mut patient_ids = Vec::with_capacity(refs.len());
        for r in refs {
            if !patient_ids.contains(&r.patient_id) {
                patient_ids.push(r.patient_id);
            }
        }
        Ok(patient_ids)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let body = serde_json::to_value(&request)
            .map_err(|e| AppointmentError::Database(StoreError::Decode(e.to_string())))?;

        let updated = self
            .store
            .patch_returning(&path, Some(auth_token), body)
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, auth_token: &str) -> Result<(), AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let deleted: Vec<Appointment> = self
            .store
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await?;

        if deleted.is_empty() {
            return Err(AppointmentError::NotFound);
        }
        Ok(())
    }
}
