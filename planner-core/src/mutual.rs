//! Mutual availability: selected dates that are not blocked and not past.

use std::collections::HashSet;

use crate::date_key::DateKey;

/// Dates in `selected` that are not in `unavailable` and fall on or after
/// `reference`, earliest first.
///
/// `reference` should be taken at call time; a cached cutoff would let past
/// dates resurface.
pub fn resolve(
    selected: &HashSet<DateKey>,
    unavailable: &HashSet<DateKey>,
    reference: &DateKey,
) -> Vec<DateKey> {
    let mut dates: Vec<DateKey> = selected
        .iter()
        .filter(|d| !unavailable.contains(*d) && *d >= reference)
        .cloned()
        .collect();
    dates.sort();
    dates
}
