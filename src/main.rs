mod commands;
mod dates;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use planner_core::{FallbackStore, JsonFileStore, Planner, PlannerConfig};

use crate::commands::plans::ConfirmArgs;
use crate::dates::parse_date_arg as date_arg;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Block dates, propose dates and confirm plans together")]
struct Cli {
    /// Use this data file instead of the configured one
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Overview of blocked dates, mutual dates and upcoming plans
    Status,
    /// Mark a date as unavailable (e.g. 2025-06-10, "next friday")
    Block { date: String },
    /// Make a blocked date available again
    Unblock { date: String },
    /// Flip a date between blocked and free
    Toggle { date: String },
    /// Unblock every date
    ClearBlocked {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Select or deselect a date you'd like to meet on
    Select { date: String },
    /// Selected dates that are free and not in the past
    Mutual,
    /// Turn a selected date into a confirmed plan
    Confirm {
        date: String,

        #[arg(short, long)]
        activity: Option<String>,

        /// Free-text time label, e.g. "7:00 PM"
        #[arg(short, long)]
        time: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        /// Start time (HH:MM)
        #[arg(long)]
        start: Option<String>,

        /// End time (HH:MM)
        #[arg(long)]
        end: Option<String>,
    },
    /// List upcoming plans
    Plans {
        /// Include past plans
        #[arg(short, long)]
        all: bool,
    },
    DeletePlan { id: String },
    /// Write a plan as an .ics file
    Export {
        plan_id: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Weekly recurring unavailability
    Pattern {
        #[command(subcommand)]
        command: PatternCommand,
    },
    /// Saved activity ideas
    Activity {
        #[command(subcommand)]
        command: ActivityCommand,
    },
    /// Save all planner data to a JSON file
    Backup { path: PathBuf },
    /// Replace all planner data from a backup file
    Restore { path: PathBuf },
    /// Show config paths and effective settings
    Config,
}

#[derive(Subcommand)]
enum PatternCommand {
    /// Block a weekday every week, e.g. `pattern add work wednesday`
    Add {
        #[arg(value_name = "TYPE")]
        kind: String,
        /// Weekday name or number (0 = Sunday)
        day: String,
    },
    List,
    /// Forget a pattern (already blocked dates stay blocked)
    Remove { id: String },
    /// Re-apply all patterns
    Apply {
        /// First date to block from (defaults to today)
        #[arg(long)]
        from: Option<String>,
    },
}

#[derive(Subcommand)]
enum ActivityCommand {
    Add { name: String },
    List,
    Remove { name: String },
    /// Book the activity on the earliest mutually free date
    Suggest { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PlannerConfig::load()?;
    if let Some(data) = cli.data {
        config.data_file = data;
    }

    run(cli.command, &config)
}

fn run(command: Commands, config: &PlannerConfig) -> Result<()> {
    let planner = || open_planner(config);

    match command {
        Commands::Status => commands::status::run(&planner()?),
        Commands::Block { date } => {
            commands::availability::block(&mut planner()?, date_arg(&date)?)
        }
        Commands::Unblock { date } => {
            commands::availability::unblock(&mut planner()?, date_arg(&date)?)
        }
        Commands::Toggle { date } => {
            commands::availability::toggle(&mut planner()?, date_arg(&date)?)
        }
        Commands::ClearBlocked { yes } => {
            commands::availability::clear_blocked(&mut planner()?, yes)
        }
        Commands::Select { date } => {
            commands::availability::select(&mut planner()?, date_arg(&date)?)
        }
        Commands::Mutual => commands::availability::mutual(&planner()?),
        Commands::Confirm {
            date,
            activity,
            time,
            location,
            start,
            end,
        } => commands::plans::confirm(
            &mut planner()?,
            date_arg(&date)?,
            ConfirmArgs {
                activity,
                time,
                location,
                start,
                end,
            },
        ),
        Commands::Plans { all } => commands::plans::list(&planner()?, all),
        Commands::DeletePlan { id } => commands::plans::delete(&mut planner()?, &id),
        Commands::Export { plan_id, output } => {
            commands::plans::export(&planner()?, &config.export, &plan_id, output).map(|_| ())
        }
        Commands::Pattern { command } => match command {
            PatternCommand::Add { kind, day } => {
                let day = commands::patterns::parse_weekday(&day)?;
                commands::patterns::add(&mut planner()?, kind, day)
            }
            PatternCommand::List => commands::patterns::list(&planner()?),
            PatternCommand::Remove { id } => commands::patterns::remove(&mut planner()?, &id),
            PatternCommand::Apply { from } => {
                let from = from.as_deref().map(date_arg).transpose()?;
                commands::patterns::apply(&mut planner()?, from)
            }
        },
        Commands::Activity { command } => match command {
            ActivityCommand::Add { name } => commands::activities::add(&mut planner()?, &name),
            ActivityCommand::List => commands::activities::list(&planner()?),
            ActivityCommand::Remove { name } => {
                commands::activities::remove(&mut planner()?, &name)
            }
            ActivityCommand::Suggest { name } => {
                commands::activities::suggest(&mut planner()?, &name)
            }
        },
        Commands::Backup { path } => commands::backup::backup(&planner()?, &path),
        Commands::Restore { path } => commands::backup::restore(&mut planner()?, &path),
        Commands::Config => commands::config::run(config),
    }
}

fn open_planner(config: &PlannerConfig) -> Result<Planner> {
    let store = FallbackStore::new(
        Box::new(JsonFileStore::new(&config.data_file)),
        Box::new(JsonFileStore::new(&config.cache_file)),
    );

    Ok(Planner::load(Box::new(store))
        .with_context(|| format!("Failed to load {}", config.data_file.display()))?
        .with_horizon_days(config.horizon_days))
}
