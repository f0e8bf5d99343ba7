//! The persisted planner state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activities::CustomActivities;
use crate::availability::Availability;
use crate::date_key::DateKey;
use crate::error::{PlannerError, PlannerResult};
use crate::plan::ConfirmedPlan;
use crate::recurrence::RecurringPattern;

pub const DATA_VERSION: &str = "1.0";

/// Everything the store saves and loads, as one blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredData")]
pub struct PlannerData {
    #[serde(flatten)]
    pub availability: Availability,
    pub confirmed_plans: Vec<ConfirmedPlan>,
    pub recurring_patterns: Vec<RecurringPattern>,
    pub custom_activities: CustomActivities,
    pub calendar_connected: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub version: String,
}

/// On-disk layout, including the key names older files used.
/// Converting into `PlannerData` re-establishes the set and list invariants.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredData {
    #[serde(default)]
    unavailable_dates: Vec<DateKey>,
    #[serde(default, alias = "gioSelectedDates")]
    selected_dates: Vec<DateKey>,
    #[serde(default)]
    confirmed_plans: Vec<ConfirmedPlan>,
    #[serde(default)]
    recurring_patterns: Vec<RecurringPattern>,
    #[serde(default)]
    custom_activities: CustomActivities,
    #[serde(default, alias = "appleCalendarConnected")]
    calendar_connected: bool,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default = "default_version")]
    version: String,
}

impl From<StoredData> for PlannerData {
    fn from(stored: StoredData) -> Self {
        let mut custom_activities = stored.custom_activities;
        custom_activities.normalize();

        PlannerData {
            availability: Availability::new(stored.unavailable_dates, stored.selected_dates),
            confirmed_plans: stored.confirmed_plans,
            recurring_patterns: stored.recurring_patterns,
            custom_activities,
            calendar_connected: stored.calendar_connected,
            last_updated: stored.last_updated,
            version: stored.version,
        }
    }
}

fn default_version() -> String {
    DATA_VERSION.to_string()
}

impl Default for PlannerData {
    fn default() -> Self {
        PlannerData {
            availability: Availability::default(),
            confirmed_plans: Vec::new(),
            recurring_patterns: Vec::new(),
            custom_activities: CustomActivities::default(),
            calendar_connected: false,
            last_updated: None,
            version: default_version(),
        }
    }
}

impl PlannerData {
    /// Parse a backup document. Backups must carry a version.
    pub fn from_backup(json: &str) -> PlannerResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| PlannerError::validation(format!("Invalid backup file: {}", e)))?;
        Self::from_backup_value(value)
    }

    pub fn from_backup_value(value: serde_json::Value) -> PlannerResult<Self> {
        if value.get("version").and_then(|v| v.as_str()).is_none()
            || !value.get("unavailableDates").is_some_and(|v| v.is_array())
        {
            return Err(PlannerError::validation("Invalid backup file format"));
        }

        serde_json::from_value(value)
            .map_err(|e| PlannerError::validation(format!("Invalid backup file: {}", e)))
    }

    pub fn to_json_pretty(&self) -> PlannerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlannerError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_loads_with_defaults() {
        let data: PlannerData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, PlannerData::default());
    }

    #[test]
    fn legacy_file_layout_loads() {
        let json = r#"{
            "unavailableDates": ["2025-06-01", "2025-06-02"],
            "gioSelectedDates": ["2025-06-02", "2025-06-10"],
            "confirmedPlans": [],
            "recurringPatterns": [],
            "appleCalendarConnected": true,
            "lastUpdated": "2025-06-01T12:00:00.000Z",
            "version": "1.0"
        }"#;
        let data = PlannerData::from_backup(json).unwrap();

        let june_2 = DateKey::parse("2025-06-02").unwrap();
        assert!(data.availability.is_unavailable(&june_2));
        // loading evicted the overlap
        assert!(!data.availability.is_selected(&june_2));
        assert!(data.calendar_connected);
    }

    #[test]
    fn backup_without_version_is_rejected() {
        let err = PlannerData::from_backup(r#"{"unavailableDates": []}"#).unwrap_err();
        assert!(matches!(err, PlannerError::Validation(_)));

        let err = PlannerData::from_backup(r#"{"version": "1.0"}"#).unwrap_err();
        assert!(matches!(err, PlannerError::Validation(_)));
    }

    #[test]
    fn saved_layout_uses_camel_case_keys() {
        let json = serde_json::to_value(PlannerData::default()).unwrap();
        for key in [
            "unavailableDates",
            "selectedDates",
            "confirmedPlans",
            "recurringPatterns",
            "customActivities",
            "calendarConnected",
            "version",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
