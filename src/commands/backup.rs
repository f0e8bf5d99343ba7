use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use planner_core::Planner;

pub fn backup(planner: &Planner, path: &Path) -> Result<()> {
    let json = planner.data().to_json_pretty()?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} {}", "Saved backup to".green(), path.display());
    Ok(())
}

pub fn restore(planner: &mut Planner, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    planner.import(value)?;

    let data = planner.data();
    println!(
        "{} {} ({} blocked, {} selected, {} plans)",
        "Restored".green(),
        path.display(),
        data.availability.unavailable().len(),
        data.availability.selected().len(),
        data.confirmed_plans.len()
    );
    Ok(())
}
