use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::{DateKey, Planner};

use crate::render::{Render, pluralize, render_date_list};

pub fn run(planner: &Planner) -> Result<()> {
    let data = planner.data();
    let today = DateKey::today();

    let mut blocked: Vec<DateKey> = data
        .availability
        .unavailable()
        .iter()
        .filter(|d| **d >= today)
        .cloned()
        .collect();
    blocked.sort();

    let mutual = planner.mutual_dates();

    let mut upcoming: Vec<_> = data
        .confirmed_plans
        .iter()
        .filter(|p| p.date >= today)
        .collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date));

    println!(
        "{} {}",
        "Blocked".bold(),
        format!("({} upcoming {})", blocked.len(), pluralize("date", blocked.len())).dimmed()
    );
    for line in render_date_list(&blocked) {
        println!("   {}", line.red());
    }

    println!();
    println!(
        "{} {}",
        "Mutually free".bold(),
        format!("({})", mutual.len()).dimmed()
    );
    if mutual.is_empty() {
        println!("   {}", "Nothing yet. Select dates with `planner select <date>`".dimmed());
    }
    for line in render_date_list(&mutual) {
        println!("   {}", line.green());
    }

    println!();
    println!("{}", "Upcoming plans".bold());
    if upcoming.is_empty() {
        println!("   {}", "None".dimmed());
    }
    for plan in upcoming {
        println!("   {}", plan.render());
    }

    if !data.recurring_patterns.is_empty() {
        println!();
        println!("{}", "Recurring".bold());
        for pattern in &data.recurring_patterns {
            println!("   {}", pattern.render());
        }
    }

    Ok(())
}
