//! Custom activity endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, post},
};
use serde::{Deserialize, Serialize};

use crate::routes::availability::PlanResponse;
use crate::routes::{Ack, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/custom-activities", post(add_activity))
        .route("/custom-activities/{name}", delete(remove_activity))
        .route("/custom-activities/{name}/suggest", post(suggest))
}

#[derive(Deserialize)]
pub struct ActivityRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct ActivityResponse {
    pub success: bool,
    pub name: String,
}

/// POST /custom-activities
async fn add_activity(
    State(state): State<AppState>,
    Json(request): Json<ActivityRequest>,
) -> Result<Json<ActivityResponse>, AppError> {
    let name = state.planner().lock().await.add_activity(&request.name)?;

    Ok(Json(ActivityResponse {
        success: true,
        name,
    }))
}

/// DELETE /custom-activities/{name}
async fn remove_activity(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Ack>, AppError> {
    state.planner().lock().await.remove_activity(&name)?;

    Ok(Ack::new("Activity removed"))
}

/// POST /custom-activities/{name}/suggest - Book the earliest mutual date
async fn suggest(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PlanResponse>, AppError> {
    let plan = state.planner().lock().await.suggest(&name)?;
    tracing::info!(plan_id = %plan.id, date = %plan.date, activity = %plan.activity, "activity scheduled");

    Ok(Json(PlanResponse {
        success: true,
        plan,
    }))
}
