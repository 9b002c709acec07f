// libs/scheduling-cell/src/services/assignment.rs
use chrono::Utc;
use futures::future::join_all;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::StoreClient;

use crate::error::ScheduleError;
use crate::models::{
    AssignScheduleRequest, AssigneeDetail, EnrichedAssignment, ScheduleAssignment,
};
use crate::services::directory::{alternative_dates, DirectoryClient};

/// Coordinates staff schedule assignment: leave gate, conflict-free insert,
/// and best-effort propagation of the assignment reference back into the
/// assignee's own record.
pub struct SchedulingService {
    store: StoreClient,
    directory: DirectoryClient,
}

impl SchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
            directory: DirectoryClient::new(config),
        }
    }

    /// Assign a staff member to a date and time slot.
    ///
    /// Step order is fixed: leave check, insert (the store's compound unique
    /// index rejects duplicates atomically), then propagation. Propagation
    /// failure leaves the assignment committed and is only logged; the
    /// assignee's record may lag behind until re-assigned by hand.
    pub async fn assign(
        &self,
        hospital_id: Uuid,
        request: AssignScheduleRequest,
        auth_token: &str,
    ) -> Result<ScheduleAssignment, ScheduleError> {
        info!(
            "Assigning {} {} to {} ({})",
            request.role, request.assigned_to, request.date, request.time_slot
        );

        // Leave gate. Roles without a registry (STAFF) skip it.
        let profile = self
            .directory
            .fetch_profile(request.role, request.assigned_to, auth_token)
            .await?;

        if let Some(profile) = &profile {
            if profile.is_on_leave(request.date) {
                let today = Utc::now().date_naive();
                return Err(ScheduleError::OnLeave {
                    role: request.role,
                    date: request.date,
                    available_dates: alternative_dates(&profile.leave_dates, today),
                });
            }
        }

        let now = Utc::now();
        let schedule: ScheduleAssignment = self
            .store
            .insert_returning(
                "/rest/v1/schedules",
                Some(auth_token),
                json!({
                    "hospital_id": hospital_id,
                    "assigned_to": request.assigned_to,
                    "role": request.role,
                    "date": request.date,
                    "time_slot": request.time_slot,
                    "created_at": now,
                    "updated_at": now,
                }),
            )
            .await?;

        // Best-effort propagation, at most once per assignment id.
        if let Some(profile) = profile {
            if profile.has_schedule_ref(schedule.id) {
                debug!(
                    "{} {} already references schedule {}, skipping propagation",
                    request.role, request.assigned_to, schedule.id
                );
            } else if let Err(e) = self
                .directory
                .push_schedule_ref(request.role, request.assigned_to, schedule.id, auth_token)
                .await
            {
                warn!(
                    "Propagation of schedule {} to {} {} failed: {}",
                    schedule.id, request.role, request.assigned_to, e
                );
            }
        }

        info!("Schedule {} assigned", schedule.id);
        Ok(schedule)
    }

    /// All assignments for a hospital, enriched with live directory details.
    /// A failed lookup degrades that row to placeholder values; it never
    /// fails the listing. Returns an empty list when nothing matches.
    pub async fn list_by_hospital(
        &self,
        hospital_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<EnrichedAssignment>, ScheduleError> {
        let path = format!("/rest/v1/schedules?hospital_id=eq.{}", hospital_id);
        let schedules: Vec<ScheduleAssignment> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let enriched = join_all(
            schedules
                .into_iter()
                .map(|schedule| self.enrich(schedule, auth_token)),
        )
        .await;

        Ok(enriched)
    }

    /// Assignments for one staff member, date ascending. An empty result is
    /// reported as not-found, unlike the hospital-wide listing.
    pub async fn list_for_assignee(
        &self,
        assigned_to: Uuid,
        auth_token: &str,
    ) -> Result<Vec<ScheduleAssignment>, ScheduleError> {
        let path = format!(
            "/rest/v1/schedules?assigned_to=eq.{}&order=date.asc",
            assigned_to
        );
        let schedules: Vec<ScheduleAssignment> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if schedules.is_empty() {
            return Err(ScheduleError::NoneFound);
        }

        Ok(schedules)
    }

    async fn enrich(&self, schedule: ScheduleAssignment, auth_token: &str) -> EnrichedAssignment {
        let detail = match self
            .directory
            .fetch_profile(schedule.role, schedule.assigned_to, auth_token)
            .await
        {
            Ok(Some(profile)) => AssigneeDetail {
                id: schedule.assigned_to,
                name: profile.name,
                email: profile.email,
                specialization: profile.specialization,
                department: profile.department,
            },
            Ok(None) => AssigneeDetail::unknown(schedule.assigned_to),
            Err(e) => {
                warn!(
                    "Failed to fetch {} {}: {}",
                    schedule.role, schedule.assigned_to, e
                );
                AssigneeDetail::unknown(schedule.assigned_to)
            }
        };

        EnrichedAssignment {
            id: schedule.id,
            hospital_id: schedule.hospital_id,
            role: schedule.role,
            date: schedule.date,
            time_slot: schedule.time_slot,
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
            assigned_to: detail,
        }
    }
}
