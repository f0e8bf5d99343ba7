//! Planner configuration.
//!
//! Values come from built-in defaults, then `~/.config/planner/config.toml`,
//! then `PLANNER_*` environment variables (`PLANNER_EXPORT__SUMMARY_PREFIX`
//! for nested keys).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::ics::ExportOptions;
use crate::recurrence::{DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS};

static DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
static DATA_FILE_NAME: &str = "planner-data.json";

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("planner"))
        .unwrap_or_else(|| PathBuf::from("data"))
        .join(DATA_FILE_NAME)
}

fn default_cache_file() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("planner"))
        .unwrap_or_else(|| PathBuf::from("data"))
        .join(DATA_FILE_NAME)
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_horizon_days() -> i64 {
    DEFAULT_HORIZON_DAYS
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// The durable JSON store.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Best-effort copy written when the durable save fails.
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// How many days ahead recurring patterns are projected.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub export: ExportOptions,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            data_file: default_data_file(),
            cache_file: default_cache_file(),
            bind_address: default_bind_address(),
            horizon_days: default_horizon_days(),
            log_level: default_log_level(),
            export: ExportOptions::default(),
        }
    }
}

impl PlannerConfig {
    pub fn config_path() -> PlannerResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlannerError::Config("Could not determine config directory".into()))?
            .join("planner");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template on first run.
    pub fn load() -> PlannerResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> PlannerResult<Self> {
        let mut config: PlannerConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("PLANNER").separator("__"))
            .build()
            .map_err(|e| PlannerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlannerError::Config(e.to_string()))?;

        config.data_file = expand_tilde(&config.data_file);
        config.cache_file = expand_tilde(&config.cache_file);

        if !(0..=MAX_HORIZON_DAYS).contains(&config.horizon_days) {
            return Err(PlannerError::Config(format!(
                "horizon_days must be between 0 and {}, got {}",
                MAX_HORIZON_DAYS, config.horizon_days
            )));
        }

        Ok(config)
    }

    /// The effective configuration as TOML.
    pub fn to_toml(&self) -> PlannerResult<String> {
        toml::to_string_pretty(self).map_err(|e| PlannerError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> PlannerResult<()> {
        let contents = format!(
            "\
# planner configuration

# Where planner data is stored:
# data_file = \"{}\"

# Local copy written when saving to data_file fails:
# cache_file = \"{}\"

# Address the HTTP server listens on:
# bind_address = \"{}\"

# Days ahead that recurring patterns block:
# horizon_days = {}

# [export]
# summary_prefix = \"Plans\"
# description = \"Planned through planner\"
",
            default_data_file().display(),
            default_cache_file().display(),
            DEFAULT_BIND_ADDRESS,
            DEFAULT_HORIZON_DAYS,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlannerError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| PlannerError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
