use std::sync::Arc;

use planner_core::{ExportOptions, Planner};
use tokio::sync::Mutex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // One planner for the whole process; requests take turns so each
    // mutation sees the previous one's committed state.
    planner: Arc<Mutex<Planner>>,
    export: Arc<ExportOptions>,
}

impl AppState {
    pub fn new(planner: Planner, export: ExportOptions) -> Self {
        AppState {
            planner: Arc::new(Mutex::new(planner)),
            export: Arc::new(export),
        }
    }

    pub fn planner(&self) -> &Mutex<Planner> {
        &self.planner
    }

    pub fn export_options(&self) -> &ExportOptions {
        &self.export
    }
}
