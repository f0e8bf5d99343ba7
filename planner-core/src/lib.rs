//! Core library for the two-person availability planner.
//!
//! One person blocks dates they can't do, the other proposes dates. This
//! crate holds everything the CLI and server share:
//! - `DateKey` for calendar days
//! - `Availability` with its eviction rule
//! - weekly `recurrence` patterns and `mutual` date resolution
//! - `Planner`, which applies every change through a `Store`
//! - `.ics` export of confirmed plans

pub mod activities;
pub mod availability;
pub mod config;
pub mod data;
pub mod date_key;
pub mod error;
pub mod ics;
mod id;
pub mod mutual;
pub mod plan;
pub mod planner;
pub mod recurrence;
pub mod store;

pub use activities::CustomActivities;
pub use availability::Availability;
pub use config::PlannerConfig;
pub use data::{DATA_VERSION, PlannerData};
pub use date_key::DateKey;
pub use error::{PlannerError, PlannerResult};
pub use ics::{ExportOptions, export_filename, generate_plan_ics};
pub use plan::{ConfirmedPlan, NewPlan, PlanDetails};
pub use planner::Planner;
pub use recurrence::{NewPattern, RecurringPattern};
pub use store::{FallbackStore, JsonFileStore, MemoryStore, Store};
