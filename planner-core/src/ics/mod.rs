//! ICS export for confirmed plans.
//!
//! Produces single-event RFC 5545 documents. Nothing here performs I/O;
//! callers decide where the text goes.

mod generate;

pub use generate::{ExportOptions, export_filename, generate_plan_ics, generate_plan_ics_in};
