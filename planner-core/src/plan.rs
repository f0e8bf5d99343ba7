//! Confirmed plans.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::error::{PlannerError, PlannerResult};
use crate::id::{deserialize_id, new_id};

pub const DEFAULT_START_TIME: &str = "19:00";
pub const DEFAULT_END_TIME: &str = "21:00";
pub const DEFAULT_TIME_LABEL: &str = "TBD";

/// A plan both parties agreed on. Immutable once created; only deletion undoes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedPlan {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub activity: String,
    pub date: DateKey,
    /// Free-text time label shown to users ("7:00 PM", "Evening").
    #[serde(default = "default_time_label")]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_start_time")]
    pub start_time: String,
    #[serde(default = "default_end_time")]
    pub end_time: String,
    #[serde(default = "default_confirmed")]
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

fn default_time_label() -> String {
    DEFAULT_TIME_LABEL.to_string()
}

fn default_start_time() -> String {
    DEFAULT_START_TIME.to_string()
}

fn default_end_time() -> String {
    DEFAULT_END_TIME.to_string()
}

fn default_confirmed() -> bool {
    true
}

/// Optional details supplied when confirming a date.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetails {
    #[serde(default)]
    pub activity: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl PlanDetails {
    pub fn activity(activity: impl Into<String>) -> Self {
        PlanDetails {
            activity: activity.into(),
            ..Default::default()
        }
    }

    pub fn for_date(self, date: &DateKey) -> NewPlan {
        NewPlan {
            activity: self.activity,
            date: date.to_string(),
            time: self.time,
            location: self.location,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Plan creation request as it arrives at the boundary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub date: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl NewPlan {
    /// Validate the request and allocate a plan with a fresh id.
    pub fn into_plan(self) -> PlannerResult<ConfirmedPlan> {
        let activity = self.activity.trim().to_string();
        if activity.is_empty() || self.date.trim().is_empty() {
            return Err(PlannerError::validation("Activity and date are required"));
        }
        let date = DateKey::parse(self.date.trim())?;

        let start_time = clock_time(self.start_time, DEFAULT_START_TIME, "startTime")?;
        let end_time = clock_time(self.end_time, DEFAULT_END_TIME, "endTime")?;

        Ok(ConfirmedPlan {
            id: new_id(),
            activity,
            date,
            time: non_empty(self.time).unwrap_or_else(default_time_label),
            location: non_empty(self.location).unwrap_or_default(),
            start_time,
            end_time,
            confirmed: true,
            created_at: Utc::now(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Normalize an optional `HH:MM` value, falling back to `default`.
fn clock_time(value: Option<String>, default: &str, field: &str) -> PlannerResult<String> {
    match non_empty(value) {
        None => Ok(default.to_string()),
        Some(v) => parse_clock_time(&v)
            .map(|t| t.format("%H:%M").to_string())
            .ok_or_else(|| {
                PlannerError::validation(format!("{} must be HH:MM, got '{}'", field, v))
            }),
    }
}

pub(crate) fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}
