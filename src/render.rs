//! Colored terminal rendering for planner types.

use chrono::Datelike;
use owo_colors::OwoColorize;
use planner_core::{ConfirmedPlan, DateKey, RecurringPattern};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for DateKey {
    fn render(&self) -> String {
        let date = self.date();
        format!("{} {}", self, date.format("%a").to_string().dimmed())
    }
}

impl Render for ConfirmedPlan {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {}",
            self.date.render(),
            self.activity.bold(),
            format!("{}-{}", self.start_time, self.end_time).dimmed()
        );
        if !self.location.is_empty() {
            line.push_str(&format!(" @ {}", self.location));
        }
        line
    }
}

impl Render for RecurringPattern {
    fn render(&self) -> String {
        format!("{} {}", self.description, self.id.dimmed())
    }
}

/// Dates grouped by month, e.g. `June 2025: 01 03 10`.
pub fn render_date_list(dates: &[DateKey]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<(i32, u32)> = None;
    let mut days: Vec<String> = Vec::new();

    for key in dates {
        let date = key.date();
        let month = (date.year(), date.month());
        if current != Some(month) {
            if let Some((year, month)) = current {
                lines.push(month_line(year, month, &days));
            }
            current = Some(month);
            days.clear();
        }
        days.push(format!("{:02}", date.day()));
    }
    if let Some((year, month)) = current {
        lines.push(month_line(year, month, &days));
    }

    lines
}

fn month_line(year: i32, month: u32, days: &[String]) -> String {
    let name = chrono::NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", year, month));
    format!("{}: {}", name, days.join(" "))
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
