//! Free-text activity ideas, independent of dates.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// Ordered list of distinct activity names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomActivities(Vec<String>);

impl CustomActivities {
    /// Add a trimmed, non-empty name that is not already listed.
    pub fn add(&mut self, name: &str) -> PlannerResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlannerError::validation("Activity name is required"));
        }
        if self.contains(name) {
            return Err(PlannerError::validation(format!(
                "Activity '{}' already exists",
                name
            )));
        }
        self.0.push(name.to_string());
        Ok(name.to_string())
    }

    pub fn remove(&mut self, name: &str) -> PlannerResult<()> {
        let index = self
            .0
            .iter()
            .position(|a| a == name.trim())
            .ok_or_else(|| PlannerError::not_found(format!("Activity '{}'", name.trim())))?;
        self.0.remove(index);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|a| a == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop blanks and repeats from data written by older clients.
    pub(crate) fn normalize(&mut self) {
        let mut seen = Vec::with_capacity(self.0.len());
        for name in self.0.drain(..) {
            let name = name.trim().to_string();
            if !name.is_empty() && !seen.contains(&name) {
                seen.push(name);
            }
        }
        self.0 = seen;
    }
}
