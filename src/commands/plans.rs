use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;
use planner_core::{DateKey, ExportOptions, PlanDetails, Planner, export_filename, generate_plan_ics};

use crate::render::Render;

/// Details given on the command line; anything missing is prompted for.
#[derive(Default)]
pub struct ConfirmArgs {
    pub activity: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

pub fn confirm(planner: &mut Planner, date: DateKey, args: ConfirmArgs) -> Result<()> {
    let interactive = args.activity.is_none();

    // --- Activity ---
    let activity = match args.activity {
        Some(a) => a,
        None => prompt_activity(planner)?,
    };

    // --- Time label / location ---
    let time = match args.time {
        Some(t) => Some(t),
        None if interactive => optional_input("  Time? (e.g. 7:00 PM, skip)")?,
        None => None,
    };
    let location = match args.location {
        Some(l) => Some(l),
        None if interactive => optional_input("  Where? (skip)")?,
        None => None,
    };

    let details = PlanDetails {
        activity,
        time,
        location,
        start_time: args.start,
        end_time: args.end,
    };

    let plan = planner.confirm(&date, details)?;

    if interactive {
        println!();
    }
    println!("{} {}", "Confirmed".green(), plan.render());
    println!("  {}", format!("id: {}", plan.id).dimmed());

    Ok(())
}

/// Pick one of the saved activities, or type a new one.
fn prompt_activity(planner: &Planner) -> Result<String> {
    let saved: Vec<&str> = planner.data().custom_activities.iter().collect();
    if saved.is_empty() {
        return Ok(Input::<String>::new()
            .with_prompt("  What are you doing?")
            .interact_text()?);
    }

    let mut items: Vec<&str> = saved.clone();
    items.push("Something else...");

    let choice = Select::new()
        .with_prompt("  What are you doing?")
        .items(&items)
        .default(0)
        .interact()?;

    if choice < saved.len() {
        Ok(saved[choice].to_string())
    } else {
        Ok(Input::<String>::new()
            .with_prompt("  Activity")
            .interact_text()?)
    }
}

fn optional_input(prompt: &str) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(String::new())
        .show_default(false)
        .interact_text()?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

pub fn list(planner: &Planner, all: bool) -> Result<()> {
    let today = DateKey::today();
    let mut plans: Vec<_> = planner
        .data()
        .confirmed_plans
        .iter()
        .filter(|p| all || p.date >= today)
        .collect();
    plans.sort_by(|a, b| a.date.cmp(&b.date));

    if plans.is_empty() {
        println!("{}", "No plans.".dimmed());
        return Ok(());
    }

    for plan in plans {
        println!("{}", plan.render());
        println!("   {}", plan.id.dimmed());
    }

    Ok(())
}

pub fn delete(planner: &mut Planner, id: &str) -> Result<()> {
    let plan = planner.delete_plan(id)?;
    println!("{} {}", "Deleted".red(), plan.render());
    Ok(())
}

/// Write a plan's .ics file and return where it went.
pub fn export(
    planner: &Planner,
    options: &ExportOptions,
    id: &str,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let plan = planner.plan(id)?;
    let ics = generate_plan_ics(plan, options)?;

    let path = output.unwrap_or_else(|| PathBuf::from(export_filename(plan)));
    std::fs::write(&path, ics)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} {}", "Exported".green(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::MemoryStore;

    fn planner_with_selection(date: &DateKey) -> Planner {
        let mut planner = Planner::load(Box::new(MemoryStore::new())).unwrap();
        planner.select(date.clone()).unwrap();
        planner
    }

    #[test]
    fn confirm_with_activity_does_not_prompt() {
        let date = DateKey::parse("2030-05-04").unwrap();
        let mut planner = planner_with_selection(&date);

        confirm(
            &mut planner,
            date.clone(),
            ConfirmArgs {
                activity: Some("Hike".into()),
                start: Some("9:30".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let plan = &planner.data().confirmed_plans[0];
        assert_eq!(plan.activity, "Hike");
        assert_eq!(plan.start_time, "09:30");
        assert_eq!(plan.time, "TBD");
        assert!(!planner.data().availability.is_selected(&date));
    }

    #[test]
    fn export_writes_ics_file() {
        let date = DateKey::parse("2030-05-04").unwrap();
        let mut planner = planner_with_selection(&date);
        let plan = planner
            .confirm(&date, PlanDetails::activity("Hike"))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("hike.ics");
        let written = export(&planner, &ExportOptions::default(), &plan.id, Some(target.clone())).unwrap();

        assert_eq!(written, target);
        let contents = std::fs::read_to_string(&target).unwrap();
        assert!(contents.starts_with("BEGIN:VCALENDAR"));
        assert!(contents.contains("SUMMARY:Plans: Hike"));
    }

    #[test]
    fn export_of_unknown_plan_fails() {
        let planner = Planner::load(Box::new(MemoryStore::new())).unwrap();
        assert!(export(&planner, &ExportOptions::default(), "missing", None).is_err());
    }
}
