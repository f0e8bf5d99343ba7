//! Canonical calendar-day keys.
//!
//! A `DateKey` is the `YYYY-MM-DD` string for one local calendar day. The form
//! is always zero-padded, so comparing two keys as strings gives the same
//! answer as comparing the dates they name. Every constructor goes through
//! `NaiveDate` and is limited to four-digit years, which means a non-canonical
//! key can never be built.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Years that fit the four-digit key form.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(String);

impl DateKey {
    /// Build a key from a year, a 0-based month and a day of month.
    pub fn encode(year: i32, month0: u32, day: u32) -> PlannerResult<Self> {
        let date = month0
            .checked_add(1)
            .and_then(|month| NaiveDate::from_ymd_opt(year, month, day))
            .ok_or_else(|| {
                PlannerError::validation(format!(
                    "{}-{:02}-{:02} is not a calendar date",
                    year,
                    u64::from(month0) + 1,
                    day
                ))
            })?;
        Self::from_date(date)
    }

    /// Split the key back into `(year, month0, day)`.
    pub fn decode(&self) -> (i32, u32, u32) {
        let date = self.date();
        (date.year(), date.month0(), date.day())
    }

    /// Key for the current local calendar day.
    pub fn today() -> Self {
        Self::format(Local::now().date_naive())
    }

    /// Key for a date, rejecting years that need more or fewer than four digits.
    pub fn from_date(date: NaiveDate) -> PlannerResult<Self> {
        if !YEAR_RANGE.contains(&date.year()) {
            return Err(PlannerError::validation(format!(
                "Year {} is outside {}-{}",
                date.year(),
                YEAR_RANGE.start(),
                YEAR_RANGE.end()
            )));
        }
        Ok(Self::format(date))
    }

    fn format(date: NaiveDate) -> Self {
        DateKey(date.format(DATE_KEY_FORMAT).to_string())
    }

    /// Parse a key, accepting only the canonical zero-padded form.
    pub fn parse(s: &str) -> PlannerResult<Self> {
        let invalid =
            || PlannerError::validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", s));

        let date = NaiveDate::parse_from_str(s, DATE_KEY_FORMAT).map_err(|_| invalid())?;
        let key = Self::from_date(date).map_err(|_| invalid())?;

        // chrono accepts "2025-6-1"; the key contract does not
        if key.0 != s {
            return Err(invalid());
        }
        Ok(key)
    }

    pub fn date(&self) -> NaiveDate {
        // The inner string is only ever produced by `format`
        NaiveDate::parse_from_str(&self.0, DATE_KEY_FORMAT)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Day of week, 0 = Sunday through 6 = Saturday.
    pub fn weekday(&self) -> u8 {
        self.date().weekday().num_days_from_sunday() as u8
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DateKey {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateKey::parse(s)
    }
}

impl TryFrom<String> for DateKey {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DateKey::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.0
    }
}

impl TryFrom<NaiveDate> for DateKey {
    type Error = PlannerError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        DateKey::from_date(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
