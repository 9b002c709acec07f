// libs/scheduling-cell/src/services/directory.rs
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::error::ScheduleError;
use crate::models::{StaffProfile, StaffRole};

/// How many calendar days ahead to scan when suggesting alternatives for a
/// leave conflict.
const ALTERNATIVE_DATE_HORIZON: usize = 14;

/// Client for the doctor and nurse registries. The registries own the staff
/// records; this cell only reads profiles and pushes schedule references.
pub struct DirectoryClient {
    client: Client,
    doctor_base: String,
    nurse_base: String,
}

impl DirectoryClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            doctor_base: config.doctor_service_url.clone(),
            nurse_base: config.nurse_service_url.clone(),
        }
    }

    fn base_for(&self, role: StaffRole) -> Option<&str> {
        match role {
            StaffRole::Doctor => Some(&self.doctor_base),
            StaffRole::Nurse => Some(&self.nurse_base),
            // Generic staff have no registry; leave checks and propagation
            // are skipped for them.
            StaffRole::Staff => None,
        }
    }

    /// Fetch the assignee's profile from the owning registry. Returns
    /// `Ok(None)` for roles without a registry. Unreachable registries are
    /// fatal to the caller: the leave check is a gate, not best-effort.
    pub async fn fetch_profile(
        &self,
        role: StaffRole,
        assigned_to: Uuid,
        auth_token: &str,
    ) -> Result<Option<StaffProfile>, ScheduleError> {
        let Some(base) = self.base_for(role) else {
            return Ok(None);
        };

        let url = format!("{}/{}", base, assigned_to);
        debug!("Fetching {} profile from {}", role, url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(auth_token)
            .send()
            .await
            .map_err(|e| ScheduleError::Directory(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScheduleError::Directory(format!(
                "{} lookup failed with status {}",
                role,
                response.status()
            )));
        }

        let profile = response
            .json::<StaffProfile>()
            .await
            .map_err(|e| ScheduleError::Directory(e.to_string()))?;

        Ok(Some(profile))
    }

    /// Push a new assignment id onto the assignee's `scheduledDates` list.
    /// The caller treats failures as a logged, accepted inconsistency.
    pub async fn push_schedule_ref(
        &self,
        role: StaffRole,
        assigned_to: Uuid,
        schedule_id: Uuid,
        auth_token: &str,
    ) -> Result<(), ScheduleError> {
        let Some(base) = self.base_for(role) else {
            return Ok(());
        };

        let url = format!("{}/{}/schedule", base, assigned_to);
        let response = self
            .client
            .patch(&url)
            .bearer_auth(auth_token)
            .json(&json!({ "scheduleId": schedule_id }))
            .send()
            .await
            .map_err(|e| ScheduleError::Directory(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            error!("Schedule propagation to {} {} failed: {}", role, assigned_to, status);
            return Err(ScheduleError::Directory(format!(
                "propagation failed with status {}",
                status
            )));
        }

        Ok(())
    }
}

/// The next `ALTERNATIVE_DATE_HORIZON` calendar days starting from `from`
/// that are not leave days, formatted as plain `YYYY-MM-DD` strings.
pub fn alternative_dates(leave_dates: &[DateTime<Utc>], from: NaiveDate) -> Vec<String> {
    let leave_days: Vec<NaiveDate> = leave_dates.iter().map(|d| d.date_naive()).collect();

    (0..ALTERNATIVE_DATE_HORIZON as i64)
        .filter_map(|offset| from.checked_add_days(chrono::Days::new(offset as u64)))
        .filter(|day| !leave_days.contains(day))
        .map(|day| day.format("%Y-%m-%d").to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(date: &str) -> DateTime<Utc> {
        let day: NaiveDate = date.parse().unwrap();
        Utc.from_utc_datetime(&day.and_hms_opt(9, 30, 0).unwrap())
    }

    #[test]
    fn alternative_dates_skips_leave_days() {
        let from: NaiveDate = "2025-06-10".parse().unwrap();
        let leave = vec![ts("2025-06-11"), ts("2025-06-13")];

        let dates = alternative_dates(&leave, from);

        assert_eq!(dates.len(), 12);
        assert!(!dates.contains(&"2025-06-11".to_string()));
        assert!(!dates.contains(&"2025-06-13".to_string()));
        assert_eq!(dates[0], "2025-06-10");
    }

    #[test]
    fn alternative_dates_full_horizon_without_leave() {
        let from: NaiveDate = "2025-06-10".parse().unwrap();
        let dates = alternative_dates(&[], from);
        assert_eq!(dates.len(), 14);
        assert_eq!(dates.last().unwrap(), "2025-06-23");
    }

    #[test]
    fn leave_comparison_ignores_time_of_day() {
        let profile = crate::models::StaffProfile {
            id: Uuid::new_v4(),
            name: "Dr. Test".to_string(),
            email: "test@example.com".to_string(),
            specialization: None,
            department: None,
            available: true,
            leave_dates: vec![ts("2025-06-10")],
            scheduled_dates: vec![],
        };

        assert!(profile.is_on_leave("2025-06-10".parse().unwrap()));
        assert!(!profile.is_on_leave("2025-06-11".parse().unwrap()));
    }
}
