//! Recurring pattern endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, post},
};
use planner_core::{DateKey, NewPattern, RecurringPattern};
use serde::{Deserialize, Serialize};

use crate::routes::{AppError, date_param};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recurring-patterns", post(add_pattern))
        .route("/recurring-patterns/apply", post(apply_patterns))
        .route("/recurring-patterns/{id}", delete(remove_pattern))
}

#[derive(Serialize)]
pub struct PatternResponse {
    pub success: bool,
    pub pattern: RecurringPattern,
}

/// POST /recurring-patterns - Store a pattern and block its upcoming dates
async fn add_pattern(
    State(state): State<AppState>,
    Json(request): Json<NewPattern>,
) -> Result<Json<PatternResponse>, AppError> {
    let pattern = state.planner().lock().await.add_pattern(request)?;
    tracing::info!(pattern_id = %pattern.id, day = pattern.day, "recurring pattern added");

    Ok(Json(PatternResponse {
        success: true,
        pattern,
    }))
}

/// DELETE /recurring-patterns/{id} - Dates already blocked stay blocked
async fn remove_pattern(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatternResponse>, AppError> {
    let pattern = state.planner().lock().await.remove_pattern(&id)?;

    Ok(Json(PatternResponse {
        success: true,
        pattern,
    }))
}

#[derive(Deserialize, Default)]
pub struct ApplyRequest {
    /// First day to project from; today when absent.
    pub from: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub success: bool,
    pub newly_blocked: usize,
}

/// POST /recurring-patterns/apply - Re-project all patterns
async fn apply_patterns(
    State(state): State<AppState>,
    request: Option<Json<ApplyRequest>>,
) -> Result<Json<ApplyResponse>, AppError> {
    let from = match request.and_then(|Json(r)| r.from) {
        Some(raw) => date_param(&raw)?,
        None => DateKey::today(),
    };
    let newly_blocked = state.planner().lock().await.apply_patterns(&from)?;

    Ok(Json(ApplyResponse {
        success: true,
        newly_blocked,
    }))
}
