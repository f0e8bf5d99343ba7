//! Health check and whole-state endpoints

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{SecondsFormat, Utc};
use planner_core::{DateKey, PlannerData, PlannerError};
use serde::Serialize;
use serde_json::Value;

use crate::routes::{Ack, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/planner-data", get(load_data).post(save_data))
        .route("/export", get(export_backup))
        .route("/import", post(import_backup))
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
}

/// GET /health
async fn health() -> Json<Health> {
    Json(Health {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct DataResponse {
    pub success: bool,
    pub data: PlannerData,
}

/// GET /planner-data - The whole planner state
async fn load_data(State(state): State<AppState>) -> Json<DataResponse> {
    let planner = state.planner().lock().await;
    Json(DataResponse {
        success: true,
        data: planner.data().clone(),
    })
}

/// POST /planner-data - Replace the whole planner state
async fn save_data(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Ack>, AppError> {
    let has_selection = ["selectedDates", "gioSelectedDates"]
        .iter()
        .any(|key| body.get(*key).is_some_and(Value::is_array));
    if !body.get("unavailableDates").is_some_and(Value::is_array) || !has_selection {
        return Err(PlannerError::validation("Invalid data format - arrays required").into());
    }

    let replacement: PlannerData = serde_json::from_value(body)
        .map_err(|e| PlannerError::validation(format!("Invalid planner data: {}", e)))?;

    state.planner().lock().await.replace_all(replacement)?;

    Ok(Ack::new("Planner data saved successfully"))
}

/// GET /export - Backup download
async fn export_backup(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.planner().lock().await.data().to_json_pretty()?;
    let disposition = format!(
        "attachment; filename=\"planner-backup-{}.json\"",
        DateKey::today()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// POST /import - Restore a backup
async fn import_backup(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Ack>, AppError> {
    state.planner().lock().await.import(body)?;
    tracing::info!("planner data restored from backup");

    Ok(Ack::new("Data imported successfully"))
}
