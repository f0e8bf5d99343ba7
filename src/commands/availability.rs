use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use planner_core::{DateKey, Planner};

use crate::render::{Render, render_date_list};

pub fn block(planner: &mut Planner, date: DateKey) -> Result<()> {
    let was_selected = planner.data().availability.is_selected(&date);

    if planner.mark_unavailable(date.clone())? {
        println!("{} {} blocked", "-".red(), date.render());
    } else {
        println!("{} was already blocked", date.render());
    }
    if was_selected {
        println!("  {}", "(removed from the selection)".dimmed());
    }

    Ok(())
}

pub fn unblock(planner: &mut Planner, date: DateKey) -> Result<()> {
    if planner.mark_available(&date)? {
        println!("{} {} is free again", "+".green(), date.render());
    } else {
        println!("{} was not blocked", date.render());
    }

    Ok(())
}

pub fn toggle(planner: &mut Planner, date: DateKey) -> Result<()> {
    if planner.toggle_unavailable(date.clone())? {
        println!("{} {} blocked", "-".red(), date.render());
    } else {
        println!("{} {} is free again", "+".green(), date.render());
    }

    Ok(())
}

pub fn clear_blocked(planner: &mut Planner, yes: bool) -> Result<()> {
    let count = planner.data().availability.unavailable().len();
    if count == 0 {
        println!("No blocked dates.");
        return Ok(());
    }

    if !yes
        && !Confirm::new()
            .with_prompt(format!("  Unblock all {} dates?", count))
            .default(false)
            .interact()?
    {
        return Ok(());
    }

    planner.clear_all_unavailable()?;
    println!("{} Unblocked {} dates", "+".green(), count);

    Ok(())
}

/// Toggle a date in the selection.
pub fn select(planner: &mut Planner, date: DateKey) -> Result<()> {
    if planner.select(date.clone())? {
        println!("{} {} selected", "+".green(), date.render());
    } else {
        println!("{} {} deselected", "-".yellow(), date.render());
    }

    Ok(())
}

pub fn mutual(planner: &Planner) -> Result<()> {
    let dates = planner.mutual_dates();

    if dates.is_empty() {
        println!("{}", "No mutually available dates.".dimmed());
        return Ok(());
    }

    for line in render_date_list(&dates) {
        println!("{}", line.green());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::MemoryStore;

    fn planner() -> Planner {
        Planner::load(Box::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn block_evicts_selection() {
        let mut planner = planner();
        let date = DateKey::parse("2030-03-01").unwrap();
        select(&mut planner, date.clone()).unwrap();

        block(&mut planner, date.clone()).unwrap();

        assert!(planner.data().availability.is_unavailable(&date));
        assert!(!planner.data().availability.is_selected(&date));
    }

    #[test]
    fn select_on_blocked_date_fails() {
        let mut planner = planner();
        let date = DateKey::parse("2030-03-01").unwrap();
        toggle(&mut planner, date.clone()).unwrap();

        assert!(select(&mut planner, date).is_err());
    }

    #[test]
    fn clear_blocked_with_yes_skips_prompt() {
        let mut planner = planner();
        block(&mut planner, DateKey::parse("2030-03-01").unwrap()).unwrap();
        block(&mut planner, DateKey::parse("2030-03-02").unwrap()).unwrap();

        clear_blocked(&mut planner, true).unwrap();

        assert!(planner.data().availability.unavailable().is_empty());
    }
}
