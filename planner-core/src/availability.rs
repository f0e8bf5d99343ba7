//! Unavailable and selected dates.
//!
//! The admin blocks dates, the proposer selects candidate dates. The two sets
//! are private so that every change goes through the methods below, which keep
//! them disjoint: blocking a date always evicts it from the selection.

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::date_key::DateKey;
use crate::error::{PlannerError, PlannerResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    #[serde(serialize_with = "sorted")]
    unavailable_dates: HashSet<DateKey>,

    #[serde(serialize_with = "sorted")]
    selected_dates: HashSet<DateKey>,
}

/// Write sets as sorted arrays so saved files are deterministic.
fn sorted<S: Serializer>(set: &HashSet<DateKey>, serializer: S) -> Result<S::Ok, S::Error> {
    let mut keys: Vec<&DateKey> = set.iter().collect();
    keys.sort();
    keys.serialize(serializer)
}

impl Availability {
    /// Build from raw sets, evicting any selected date that is also blocked.
    pub fn new(
        unavailable: impl IntoIterator<Item = DateKey>,
        selected: impl IntoIterator<Item = DateKey>,
    ) -> Self {
        let mut availability = Availability::default();
        availability.replace_unavailable(unavailable);
        availability.replace_selected(selected);
        availability
    }

    /// Block a date. Returns true if it was not already blocked.
    pub fn mark_unavailable(&mut self, date: DateKey) -> bool {
        self.selected_dates.remove(&date);
        self.unavailable_dates.insert(date)
    }

    /// Unblock a date. The selection is not touched.
    pub fn mark_available(&mut self, date: &DateKey) -> bool {
        self.unavailable_dates.remove(date)
    }

    /// Flip a date's blocked state and return the new state.
    pub fn toggle_unavailable(&mut self, date: DateKey) -> bool {
        if self.mark_available(&date) {
            false
        } else {
            self.mark_unavailable(date);
            true
        }
    }

    /// Toggle the proposer's selection of a date and return the new state.
    ///
    /// Blocked dates cannot be selected; the sets are left unchanged and the
    /// caller gets `UnavailableDate`.
    pub fn select(&mut self, date: DateKey) -> PlannerResult<bool> {
        if self.unavailable_dates.contains(&date) {
            return Err(PlannerError::UnavailableDate(date));
        }

        if self.selected_dates.remove(&date) {
            Ok(false)
        } else {
            self.selected_dates.insert(date);
            Ok(true)
        }
    }

    pub fn deselect(&mut self, date: &DateKey) -> bool {
        self.selected_dates.remove(date)
    }

    pub fn clear_all_unavailable(&mut self) {
        self.unavailable_dates.clear();
    }

    /// Replace the blocked set wholesale; newly blocked dates leave the selection.
    pub fn replace_unavailable(&mut self, dates: impl IntoIterator<Item = DateKey>) {
        self.unavailable_dates = dates.into_iter().collect();
        let blocked = &self.unavailable_dates;
        self.selected_dates.retain(|d| !blocked.contains(d));
    }

    /// Replace the selection wholesale, dropping anything currently blocked.
    pub fn replace_selected(&mut self, dates: impl IntoIterator<Item = DateKey>) {
        let blocked = &self.unavailable_dates;
        self.selected_dates = dates.into_iter().filter(|d| !blocked.contains(d)).collect();
    }

    pub fn is_unavailable(&self, date: &DateKey) -> bool {
        self.unavailable_dates.contains(date)
    }

    pub fn is_selected(&self, date: &DateKey) -> bool {
        self.selected_dates.contains(date)
    }

    pub fn unavailable(&self) -> &HashSet<DateKey> {
        &self.unavailable_dates
    }

    pub fn selected(&self) -> &HashSet<DateKey> {
        &self.selected_dates
    }
}
