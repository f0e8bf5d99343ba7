//! ICS file generation.

use chrono::{Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use icalendar::{Alarm, Calendar, Component, EventLike, Trigger};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::plan::{ConfirmedPlan, DEFAULT_END_TIME, DEFAULT_START_TIME, parse_clock_time};

/// Minutes before the start that the single reminder fires.
const REMINDER_MINUTES: i64 = 15;

const UTC_BASIC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Text that frames every exported event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Put in front of the activity in SUMMARY, e.g. "Plans: Hike".
    pub summary_prefix: String,
    pub description: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            summary_prefix: "Plans".to_string(),
            description: "Planned through planner".to_string(),
        }
    }
}

/// Generate .ics content for a plan, reading its times as local wall-clock time.
pub fn generate_plan_ics(plan: &ConfirmedPlan, options: &ExportOptions) -> PlannerResult<String> {
    generate_plan_ics_in(plan, options, &Local)
}

/// Generate .ics content for a plan whose times are wall-clock time in `tz`.
///
/// DTSTART/DTEND are always written in UTC basic format.
pub fn generate_plan_ics_in<Tz: TimeZone>(
    plan: &ConfirmedPlan,
    options: &ExportOptions,
    tz: &Tz,
) -> PlannerResult<String> {
    let date = plan.date.date();
    let start_time = clock_or_default(&plan.start_time, DEFAULT_START_TIME)?;
    let end_time = clock_or_default(&plan.end_time, DEFAULT_END_TIME)?;

    let start = date.and_time(start_time);
    let mut end = date.and_time(end_time);
    // "22:00" to "01:00" runs past midnight
    if end <= start {
        end += Duration::days(1);
    }

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&plan.id);
    ics_event.add_property("DTSTAMP", plan.created_at.format(UTC_BASIC_FORMAT).to_string());
    ics_event.add_property("DTSTART", to_utc_basic(start, tz)?);
    ics_event.add_property("DTEND", to_utc_basic(end, tz)?);
    ics_event.summary(&summary_for(plan, options));
    ics_event.description(&options.description);

    if !plan.location.trim().is_empty() {
        ics_event.location(plan.location.trim());
    }

    let trigger = Trigger::before_start(Duration::minutes(REMINDER_MINUTES));
    ics_event.alarm(Alarm::display("Reminder", trigger));

    let mut cal = Calendar::new();
    cal.push(ics_event.done());
    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

/// Download name for a plan's export, e.g. `plan-movie-night-2025-06-10.ics`.
pub fn export_filename(plan: &ConfirmedPlan) -> String {
    let slug = slug::slugify(&plan.activity);
    if slug.is_empty() {
        format!("plan-{}.ics", plan.date)
    } else {
        format!("plan-{}-{}.ics", slug, plan.date)
    }
}

fn summary_for(plan: &ConfirmedPlan, options: &ExportOptions) -> String {
    let prefix = options.summary_prefix.trim();
    if prefix.is_empty() {
        plan.activity.clone()
    } else {
        format!("{}: {}", prefix, plan.activity)
    }
}

fn clock_or_default(value: &str, default: &str) -> PlannerResult<NaiveTime> {
    let value = if value.trim().is_empty() {
        default
    } else {
        value.trim()
    };
    parse_clock_time(value)
        .ok_or_else(|| PlannerError::IcsGenerate(format!("Invalid time '{}'", value)))
}

fn to_utc_basic<Tz: TimeZone>(local: NaiveDateTime, tz: &Tz) -> PlannerResult<String> {
    let resolved = tz.from_local_datetime(&local).earliest().ok_or_else(|| {
        PlannerError::IcsGenerate(format!("{} does not exist in the local timezone", local))
    })?;
    Ok(resolved.with_timezone(&Utc).format(UTC_BASIC_FORMAT).to_string())
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Remove DTSTAMP and UID inside VALARM sections (not required by RFC 5545)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:-//planner//EN\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
