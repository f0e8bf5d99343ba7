//! Error types for the planner.

use thiserror::Error;

use crate::date_key::DateKey;

/// Errors that can occur in planner operations.
///
/// None of these are fatal: validation, lookup and availability errors leave
/// state untouched, and persistence errors are retryable.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Date {0} is marked unavailable")]
    UnavailableDate(DateKey),

    /// `cached` records whether the fallback cache took a copy.
    #[error("Could not save planner data: {message}")]
    Persistence { message: String, cached: bool },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlannerError {
    pub fn validation(message: impl Into<String>) -> Self {
        PlannerError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        PlannerError::NotFound(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        PlannerError::Persistence {
            message: message.into(),
            cached: false,
        }
    }
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
