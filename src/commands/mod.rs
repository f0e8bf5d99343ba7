pub mod activities;
pub mod availability;
pub mod backup;
pub mod config;
pub mod plans;
pub mod patterns;
pub mod status;
