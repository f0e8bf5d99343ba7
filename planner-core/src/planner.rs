//! The planner state manager.
//!
//! `Planner` owns the planner data and the store it came from. Each mutation
//! runs against a draft copy; the draft replaces the in-memory state only
//! after the store acknowledges the save. A failed save therefore leaves the
//! planner exactly as it was.

use std::collections::BTreeSet;

use crate::data::PlannerData;
use crate::date_key::DateKey;
use crate::error::{PlannerError, PlannerResult};
use crate::mutual;
use crate::plan::{ConfirmedPlan, NewPlan, PlanDetails};
use crate::recurrence::{self, DEFAULT_HORIZON_DAYS, NewPattern, RecurringPattern};
use crate::store::Store;

pub struct Planner {
    data: PlannerData,
    store: Box<dyn Store>,
    horizon_days: i64,
}

impl Planner {
    /// Load the current state from `store`.
    pub fn load(store: Box<dyn Store>) -> PlannerResult<Self> {
        let data = store.load()?;
        Ok(Planner {
            data,
            store,
            horizon_days: DEFAULT_HORIZON_DAYS,
        })
    }

    pub fn with_horizon_days(mut self, horizon_days: i64) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    /// Discard in-memory state and re-read the store.
    pub fn reload(&mut self) -> PlannerResult<()> {
        self.data = self.store.load()?;
        Ok(())
    }

    pub fn data(&self) -> &PlannerData {
        &self.data
    }

    /// Apply `change` to a copy of the data, save it, then adopt it.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut PlannerData) -> PlannerResult<T>,
    ) -> PlannerResult<T> {
        let mut draft = self.data.clone();
        let value = change(&mut draft)?;
        self.store.save(&draft)?;
        self.data = draft;
        Ok(value)
    }

    // AVAILABILITY:

    pub fn mark_unavailable(&mut self, date: DateKey) -> PlannerResult<bool> {
        self.commit(|data| Ok(data.availability.mark_unavailable(date)))
    }

    pub fn mark_available(&mut self, date: &DateKey) -> PlannerResult<bool> {
        self.commit(|data| Ok(data.availability.mark_available(date)))
    }

    /// Returns whether the date is unavailable afterwards.
    pub fn toggle_unavailable(&mut self, date: DateKey) -> PlannerResult<bool> {
        self.commit(|data| Ok(data.availability.toggle_unavailable(date)))
    }

    /// Returns whether the date is selected afterwards.
    pub fn select(&mut self, date: DateKey) -> PlannerResult<bool> {
        self.commit(|data| data.availability.select(date))
    }

    pub fn clear_all_unavailable(&mut self) -> PlannerResult<()> {
        self.commit(|data| {
            data.availability.clear_all_unavailable();
            Ok(())
        })
    }

    pub fn replace_unavailable(&mut self, dates: Vec<DateKey>) -> PlannerResult<()> {
        self.commit(|data| {
            data.availability.replace_unavailable(dates);
            Ok(())
        })
    }

    pub fn replace_selected(&mut self, dates: Vec<DateKey>) -> PlannerResult<()> {
        self.commit(|data| {
            data.availability.replace_selected(dates);
            Ok(())
        })
    }

    // RECURRING PATTERNS:

    /// Store a new pattern and immediately block its dates from today on.
    pub fn add_pattern(&mut self, request: NewPattern) -> PlannerResult<RecurringPattern> {
        let pattern = request.into_pattern()?;
        let from = DateKey::today();
        let horizon = self.horizon_days;

        self.commit(|data| {
            data.recurring_patterns.push(pattern.clone());
            block_pattern_dates(data, &from, horizon)?;
            Ok(pattern)
        })
    }

    /// Forget a pattern. Dates it already blocked stay blocked.
    pub fn remove_pattern(&mut self, id: &str) -> PlannerResult<RecurringPattern> {
        self.commit(|data| {
            let index = data
                .recurring_patterns
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| PlannerError::not_found(format!("Pattern '{}'", id)))?;
            Ok(data.recurring_patterns.remove(index))
        })
    }

    /// Re-project every pattern from `from`. Returns how many dates became blocked.
    pub fn apply_patterns(&mut self, from: &DateKey) -> PlannerResult<usize> {
        let horizon = self.horizon_days;
        self.commit(|data| block_pattern_dates(data, from, horizon))
    }

    // MUTUAL AVAILABILITY:

    /// Mutually available dates as of today.
    pub fn mutual_dates(&self) -> Vec<DateKey> {
        self.mutual_dates_at(&DateKey::today())
    }

    pub fn mutual_dates_at(&self, reference: &DateKey) -> Vec<DateKey> {
        mutual::resolve(
            self.data.availability.selected(),
            self.data.availability.unavailable(),
            reference,
        )
    }

    // PLANS:

    /// Turn a selected date into a confirmed plan and drop it from the selection.
    pub fn confirm(&mut self, date: &DateKey, details: PlanDetails) -> PlannerResult<ConfirmedPlan> {
        if self.data.availability.is_unavailable(date) {
            return Err(PlannerError::UnavailableDate(date.clone()));
        }
        if !self.data.availability.is_selected(date) {
            return Err(PlannerError::validation(format!(
                "Date {} has not been selected",
                date
            )));
        }

        let plan = details.for_date(date).into_plan()?;

        self.commit(|data| {
            data.confirmed_plans.push(plan.clone());
            data.availability.deselect(date);
            Ok(plan)
        })
    }

    /// Record a plan directly, without the selection precondition.
    pub fn create_plan(&mut self, request: NewPlan) -> PlannerResult<ConfirmedPlan> {
        let plan = request.into_plan()?;
        self.commit(|data| {
            data.confirmed_plans.push(plan.clone());
            Ok(plan)
        })
    }

    pub fn delete_plan(&mut self, id: &str) -> PlannerResult<ConfirmedPlan> {
        self.commit(|data| {
            let index = data
                .confirmed_plans
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| PlannerError::not_found(format!("Plan '{}'", id)))?;
            Ok(data.confirmed_plans.remove(index))
        })
    }

    pub fn plan(&self, id: &str) -> PlannerResult<&ConfirmedPlan> {
        self.data
            .confirmed_plans
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PlannerError::not_found(format!("Plan '{}'", id)))
    }

    /// Confirm the earliest mutually available date for `activity`.
    pub fn suggest(&mut self, activity: &str) -> PlannerResult<ConfirmedPlan> {
        let date = self
            .mutual_dates()
            .into_iter()
            .next()
            .ok_or_else(|| PlannerError::validation("No mutually available dates to plan for"))?;

        self.confirm(&date, PlanDetails::activity(activity))
    }

    // ACTIVITIES:

    pub fn add_activity(&mut self, name: &str) -> PlannerResult<String> {
        self.commit(|data| data.custom_activities.add(name))
    }

    pub fn remove_activity(&mut self, name: &str) -> PlannerResult<()> {
        self.commit(|data| data.custom_activities.remove(name))
    }

    // WHOLE STATE:

    pub fn set_calendar_connected(&mut self, connected: bool) -> PlannerResult<()> {
        self.commit(|data| {
            data.calendar_connected = connected;
            Ok(())
        })
    }

    /// Save a complete replacement of the state.
    pub fn replace_all(&mut self, replacement: PlannerData) -> PlannerResult<()> {
        self.commit(|data| {
            *data = replacement;
            Ok(())
        })
    }

    /// Restore a backup document.
    pub fn import(&mut self, backup: serde_json::Value) -> PlannerResult<()> {
        let replacement = PlannerData::from_backup_value(backup)?;
        self.replace_all(replacement)
    }

    pub fn clear_all(&mut self) -> PlannerResult<()> {
        self.replace_all(PlannerData::default())
    }
}

/// Merge the expansion of all patterns into the unavailable set.
fn block_pattern_dates(data: &mut PlannerData, from: &DateKey, horizon: i64) -> PlannerResult<usize> {
    let dates: BTreeSet<DateKey> = recurrence::expand(&data.recurring_patterns, from, horizon)?;

    Ok(dates
        .into_iter()
        .filter(|date| data.availability.mark_unavailable(date.clone()))
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    fn planner() -> (Planner, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let planner = Planner::load(Box::new(store.clone())).unwrap();
        (planner, store)
    }

    /// A date safely in the future, so "today" never cuts it off.
    fn future(days: i64) -> DateKey {
        DateKey::from_date(DateKey::today().date() + chrono::Duration::days(days)).unwrap()
    }

    #[test]
    fn confirm_moves_date_from_selection_to_plan() {
        let (mut planner, store) = planner();
        planner.select(key("2025-06-10")).unwrap();

        let plan = planner
            .confirm(&key("2025-06-10"), PlanDetails::activity("Hike"))
            .unwrap();

        assert_eq!(plan.date, key("2025-06-10"));
        assert_eq!(plan.activity, "Hike");
        assert_eq!(plan.start_time, "19:00");
        assert_eq!(plan.end_time, "21:00");
        assert!(!planner.data().availability.is_selected(&key("2025-06-10")));
        assert_eq!(planner.data().confirmed_plans.len(), 1);
        assert_eq!(store.saved().unwrap(), *planner.data());
    }

    #[test]
    fn confirming_twice_does_not_duplicate() {
        let (mut planner, _) = planner();
        planner.select(key("2025-06-10")).unwrap();
        planner
            .confirm(&key("2025-06-10"), PlanDetails::activity("Hike"))
            .unwrap();

        let err = planner
            .confirm(&key("2025-06-10"), PlanDetails::activity("Hike"))
            .unwrap_err();

        assert!(matches!(err, PlannerError::Validation(_)));
        assert_eq!(planner.data().confirmed_plans.len(), 1);

        // re-selecting allows a second plan on the same day
        planner.select(key("2025-06-10")).unwrap();
        let second = planner
            .confirm(&key("2025-06-10"), PlanDetails::activity("Dinner"))
            .unwrap();
        assert_eq!(planner.data().confirmed_plans.len(), 2);
        assert_ne!(planner.data().confirmed_plans[0].id, second.id);
    }

    #[test]
    fn confirm_requires_activity() {
        let (mut planner, _) = planner();
        planner.select(key("2025-06-10")).unwrap();

        let err = planner
            .confirm(&key("2025-06-10"), PlanDetails::default())
            .unwrap_err();

        assert!(matches!(err, PlannerError::Validation(_)));
        assert!(planner.data().availability.is_selected(&key("2025-06-10")));
    }

    #[test]
    fn failed_save_leaves_state_untouched() {
        let (mut planner, store) = planner();
        planner.select(key("2025-06-10")).unwrap();
        let before = planner.data().clone();

        store.set_failing(true);
        let err = planner
            .confirm(&key("2025-06-10"), PlanDetails::activity("Hike"))
            .unwrap_err();

        assert!(matches!(err, PlannerError::Persistence { .. }));
        assert_eq!(*planner.data(), before);
        assert!(planner.data().availability.is_selected(&key("2025-06-10")));

        store.set_failing(false);
        planner
            .confirm(&key("2025-06-10"), PlanDetails::activity("Hike"))
            .unwrap();
        assert_eq!(planner.data().confirmed_plans.len(), 1);
    }

    #[test]
    fn selecting_unavailable_date_is_reported() {
        let (mut planner, _) = planner();
        planner.mark_unavailable(key("2025-06-10")).unwrap();

        let err = planner.select(key("2025-06-10")).unwrap_err();

        assert!(matches!(err, PlannerError::UnavailableDate(_)));
        assert!(planner.data().availability.selected().is_empty());
    }

    #[test]
    fn blocking_evicts_selection_through_planner() {
        let (mut planner, _) = planner();
        planner.select(key("2025-06-10")).unwrap();
        assert!(planner.toggle_unavailable(key("2025-06-10")).unwrap());
        assert!(!planner.data().availability.is_selected(&key("2025-06-10")));
    }

    #[test]
    fn mutual_dates_skip_past_and_blocked() {
        let (mut planner, _) = planner();
        planner.select(key("2025-06-10")).unwrap();
        planner.select(key("2025-06-01")).unwrap();

        assert_eq!(
            planner.mutual_dates_at(&key("2025-06-05")),
            vec![key("2025-06-10")]
        );

        let soon = future(3);
        let later = future(10);
        planner.select(later.clone()).unwrap();
        planner.select(soon.clone()).unwrap();
        assert_eq!(planner.mutual_dates(), vec![soon, later]);
    }

    #[test]
    fn applying_patterns_twice_is_idempotent() {
        let (mut planner, _) = planner();
        planner
            .replace_all(PlannerData {
                recurring_patterns: vec![NewPattern::new("busy", 0).into_pattern().unwrap()],
                ..PlannerData::default()
            })
            .unwrap();

        let from = key("2025-06-01");
        let first = planner.apply_patterns(&from).unwrap();
        let after_once = planner.data().availability.clone();
        let second = planner.apply_patterns(&from).unwrap();

        assert_eq!(first, 53);
        assert_eq!(second, 0);
        assert_eq!(planner.data().availability, after_once);
    }

    #[test]
    fn pattern_expansion_evicts_selected_dates() {
        let (mut planner, _) = planner();
        planner.select(key("2025-06-08")).unwrap(); // Sunday
        planner.select(key("2025-06-09")).unwrap(); // Monday
        planner
            .replace_all(PlannerData {
                recurring_patterns: vec![NewPattern::new("busy", 0).into_pattern().unwrap()],
                ..planner.data().clone()
            })
            .unwrap();

        planner.apply_patterns(&key("2025-06-01")).unwrap();

        assert!(!planner.data().availability.is_selected(&key("2025-06-08")));
        assert!(planner.data().availability.is_selected(&key("2025-06-09")));
    }

    #[test]
    fn add_pattern_blocks_upcoming_weekdays() {
        let (mut planner, _) = planner();
        let pattern = planner.add_pattern(NewPattern::new("busy", 3)).unwrap();

        assert_eq!(planner.data().recurring_patterns, vec![pattern]);
        let blocked = planner.data().availability.unavailable();
        assert!(blocked.len() >= 52);
        assert!(blocked.iter().all(|d| d.weekday() == 3));
    }

    #[test]
    fn remove_pattern_keeps_blocked_dates() {
        let (mut planner, _) = planner();
        let pattern = planner.add_pattern(NewPattern::new("busy", 1)).unwrap();
        let blocked = planner.data().availability.unavailable().len();

        planner.remove_pattern(&pattern.id).unwrap();

        assert!(planner.data().recurring_patterns.is_empty());
        assert_eq!(planner.data().availability.unavailable().len(), blocked);
        assert!(matches!(
            planner.remove_pattern(&pattern.id),
            Err(PlannerError::NotFound(_))
        ));
    }

    #[test]
    fn delete_plan_by_id() {
        let (mut planner, _) = planner();
        let plan = planner
            .create_plan(NewPlan {
                activity: "Picnic".into(),
                date: "2025-07-04".into(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(planner.plan(&plan.id).unwrap().activity, "Picnic");
        planner.delete_plan(&plan.id).unwrap();
        assert!(matches!(planner.delete_plan(&plan.id), Err(PlannerError::NotFound(_))));
        assert!(planner.plan(&plan.id).is_err());
    }

    #[test]
    fn suggest_uses_earliest_mutual_date() {
        let (mut planner, _) = planner();
        assert!(matches!(planner.suggest("Picnic"), Err(PlannerError::Validation(_))));

        let soon = future(2);
        planner.select(future(9)).unwrap();
        planner.select(soon.clone()).unwrap();

        let plan = planner.suggest("Picnic").unwrap();
        assert_eq!(plan.date, soon);
        assert_eq!(plan.activity, "Picnic");
    }

    #[test]
    fn import_validates_and_replaces() {
        let (mut planner, _) = planner();
        planner.add_activity("Bowling").unwrap();

        assert!(planner.import(serde_json::json!({"foo": 1})).is_err());
        assert_eq!(planner.data().custom_activities.len(), 1);

        planner
            .import(serde_json::json!({
                "version": "1.0",
                "unavailableDates": ["2025-06-01"],
                "gioSelectedDates": ["2025-06-02"]
            }))
            .unwrap();
        assert!(planner.data().custom_activities.is_empty());
        assert!(planner.data().availability.is_selected(&key("2025-06-02")));
    }

    #[test]
    fn reload_picks_up_store_contents() {
        let (mut planner, store) = planner();
        let mut external = PlannerData::default();
        external.calendar_connected = true;
        store.save(&external).unwrap();

        planner.reload().unwrap();
        assert!(planner.data().calendar_connected);
    }
}
