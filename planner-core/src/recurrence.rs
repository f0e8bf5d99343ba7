//! Weekly recurring unavailability.
//!
//! A pattern blocks one weekday. Patterns are projected forward over a closed
//! window of days (today through today + 365 by default) into concrete date
//! keys, which the caller merges into the unavailable set. Expansion returns a
//! set, so re-applying the same patterns never duplicates anything.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::error::{PlannerError, PlannerResult};
use crate::id::{deserialize_id, new_id};

/// Days past the start date that a pattern is projected.
pub const DEFAULT_HORIZON_DAYS: i64 = 365;

/// Largest horizon one expansion covers; a single `RRuleSet::all` call
/// returns at most `u16::MAX` occurrences.
pub const MAX_HORIZON_DAYS: i64 = 36_500;

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const BYDAY_CODES: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPattern {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Free-text label, e.g. "busy" or "unavailable".
    #[serde(rename = "type")]
    pub kind: String,
    /// Weekday, 0 = Sunday.
    pub day: u8,
    pub day_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request to create a pattern.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPattern {
    #[serde(rename = "type")]
    pub kind: String,
    pub day: i64,
    #[serde(default)]
    pub day_name: Option<String>,
}

impl NewPattern {
    pub fn new(kind: impl Into<String>, day: i64) -> Self {
        NewPattern {
            kind: kind.into(),
            day,
            day_name: None,
        }
    }

    /// Validate the request and build the stored pattern.
    pub fn into_pattern(self) -> PlannerResult<RecurringPattern> {
        let kind = self.kind.trim().to_string();
        if kind.is_empty() {
            return Err(PlannerError::validation("Pattern type is required"));
        }

        let day = u8::try_from(self.day)
            .ok()
            .filter(|d| *d < 7)
            .ok_or_else(|| {
                PlannerError::validation(format!("Weekday must be 0-6, got {}", self.day))
            })?;

        let day_name = self
            .day_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DAY_NAMES[day as usize].to_string());

        Ok(RecurringPattern {
            id: new_id(),
            description: format!("Every {} ({})", day_name, kind),
            kind,
            day,
            day_name,
            created_at: Some(Utc::now()),
        })
    }
}

/// Every date in `[from, from + horizon_days]` that falls on a pattern's weekday.
pub fn expand(
    patterns: &[RecurringPattern],
    from: &DateKey,
    horizon_days: i64,
) -> PlannerResult<BTreeSet<DateKey>> {
    let mut weekdays: Vec<u8> = patterns.iter().map(|p| p.day).filter(|d| *d < 7).collect();
    weekdays.sort_unstable();
    weekdays.dedup();

    if horizon_days > MAX_HORIZON_DAYS {
        return Err(PlannerError::validation(format!(
            "Horizon of {} days exceeds the {} day maximum",
            horizon_days, MAX_HORIZON_DAYS
        )));
    }

    if weekdays.is_empty() || horizon_days < 0 {
        return Ok(BTreeSet::new());
    }

    let rrule_set: RRuleSet = build_rrule_string(from, &weekdays)
        .parse()
        .map_err(|e| PlannerError::validation(format!("Failed to build weekly rule: {}", e)))?;

    let start = from.date().and_time(chrono::NaiveTime::MIN).and_utc();
    // Keys stop at the last four-digit year
    let last_day = NaiveDate::from_ymd_opt(9999, 12, 31)
        .unwrap_or(NaiveDate::MAX)
        .and_time(chrono::NaiveTime::MIN)
        .and_utc();
    let end = (start + Duration::days(horizon_days)).min(last_day);

    // after/before are exclusive; widen by a second so both edge days count
    let tz: rrule::Tz = Utc.into();
    let after = (start - Duration::seconds(1)).with_timezone(&tz);
    let before = (end + Duration::seconds(1)).with_timezone(&tz);

    let weeks = (horizon_days / 7 + 2) as usize;
    let limit = u16::try_from(weeks * weekdays.len()).map_err(|_| {
        PlannerError::validation(format!("Horizon of {} days is too long", horizon_days))
    })?;

    let result = rrule_set.after(after).before(before).all(limit);

    let mut dates = BTreeSet::new();
    for dt in &result.dates {
        let key = DateKey::from_date(dt.date_naive())?;
        if &key >= from && weekdays.contains(&key.weekday()) {
            dates.insert(key);
        }
    }
    Ok(dates)
}

/// Weekly rule anchored at midnight UTC of the first day.
fn build_rrule_string(from: &DateKey, weekdays: &[u8]) -> String {
    let byday: Vec<&str> = weekdays.iter().map(|d| BYDAY_CODES[*d as usize]).collect();

    format!(
        "DTSTART:{}T000000Z\nRRULE:FREQ=WEEKLY;BYDAY={}",
        from.date().format("%Y%m%d"),
        byday.join(",")
    )
}
