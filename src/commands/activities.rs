use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::Planner;

use crate::render::Render;

pub fn add(planner: &mut Planner, name: &str) -> Result<()> {
    let name = planner.add_activity(name)?;
    println!("{} {}", "+".green(), name);
    Ok(())
}

pub fn list(planner: &Planner) -> Result<()> {
    let activities = &planner.data().custom_activities;
    if activities.is_empty() {
        println!("{}", "No saved activities.".dimmed());
    }
    for name in activities.iter() {
        println!("{}", name);
    }
    Ok(())
}

pub fn remove(planner: &mut Planner, name: &str) -> Result<()> {
    planner.remove_activity(name)?;
    println!("{} {}", "-".red(), name.trim());
    Ok(())
}

/// Book the activity on the earliest mutually free date.
pub fn suggest(planner: &mut Planner, name: &str) -> Result<()> {
    let plan = planner.suggest(name)?;
    println!("{} {}", "Booked".green(), plan.render());
    println!("  {}", format!("id: {}", plan.id).dimmed());
    Ok(())
}
