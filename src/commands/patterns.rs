use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::{DateKey, NewPattern, Planner};

use crate::render::{Render, pluralize};

/// Weekday number (0 = Sunday) from a number or an English day name.
pub fn parse_weekday(input: &str) -> Result<i64> {
    if let Ok(n) = input.trim().parse::<i64>() {
        return Ok(n);
    }

    let lower = input.trim().to_lowercase();
    let names = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];
    names
        .iter()
        .position(|n| lower.starts_with(n))
        .map(|i| i as i64)
        .ok_or_else(|| anyhow::anyhow!("Unknown weekday: \"{}\"", input))
}

pub fn add(planner: &mut Planner, kind: String, day: i64) -> Result<()> {
    let before = planner.data().availability.unavailable().len();
    let pattern = planner.add_pattern(NewPattern::new(kind, day))?;
    let blocked = planner.data().availability.unavailable().len() - before;

    println!("{} {}", "+".green(), pattern.render());
    println!(
        "  {}",
        format!("blocked {} more {}", blocked, pluralize("date", blocked)).dimmed()
    );

    Ok(())
}

pub fn list(planner: &Planner) -> Result<()> {
    let patterns = &planner.data().recurring_patterns;
    if patterns.is_empty() {
        println!("{}", "No recurring patterns.".dimmed());
    }
    for pattern in patterns {
        println!("{}", pattern.render());
    }
    Ok(())
}

pub fn remove(planner: &mut Planner, id: &str) -> Result<()> {
    let pattern = planner.remove_pattern(id)?;
    println!("{} {}", "-".red(), pattern.description);
    println!(
        "  {}",
        "Dates it already blocked stay blocked; use `planner unblock` to free them.".dimmed()
    );
    Ok(())
}

pub fn apply(planner: &mut Planner, from: Option<DateKey>) -> Result<()> {
    let from = from.unwrap_or_else(DateKey::today);
    let count = planner.apply_patterns(&from)?;
    println!(
        "Blocked {} new {} from {}",
        count,
        pluralize("date", count),
        from
    );
    Ok(())
}
