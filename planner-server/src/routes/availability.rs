//! Unavailable/selected dates and mutual availability

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use planner_core::{ConfirmedPlan, DateKey, PlanDetails};
use serde::{Deserialize, Serialize};

use crate::routes::{AppError, date_param};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/unavailable-dates",
            put(replace_unavailable).delete(clear_unavailable),
        )
        .route("/unavailable-dates/{date}/toggle", post(toggle_unavailable))
        .route("/selected-dates", put(replace_selected))
        // older clients
        .route("/gio-selections", put(replace_selected))
        .route("/selected-dates/{date}/toggle", post(toggle_selected))
        .route("/mutual-dates", get(mutual_dates))
        .route("/mutual-dates/{date}/confirm", post(confirm))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableBody {
    pub unavailable_dates: Vec<DateKey>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedBody {
    #[serde(alias = "gioSelectedDates")]
    pub selected_dates: Vec<DateKey>,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub success: bool,
    pub count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateState {
    pub success: bool,
    pub date: DateKey,
    pub unavailable: bool,
    pub selected: bool,
}

/// PUT /unavailable-dates - Replace the blocked set
async fn replace_unavailable(
    State(state): State<AppState>,
    Json(body): Json<UnavailableBody>,
) -> Result<Json<CountResponse>, AppError> {
    let mut planner = state.planner().lock().await;
    planner.replace_unavailable(body.unavailable_dates)?;

    Ok(Json(CountResponse {
        success: true,
        count: planner.data().availability.unavailable().len(),
    }))
}

/// DELETE /unavailable-dates - Unblock everything
async fn clear_unavailable(State(state): State<AppState>) -> Result<Json<CountResponse>, AppError> {
    state.planner().lock().await.clear_all_unavailable()?;

    Ok(Json(CountResponse {
        success: true,
        count: 0,
    }))
}

/// POST /unavailable-dates/{date}/toggle
async fn toggle_unavailable(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DateState>, AppError> {
    let date = date_param(&date)?;
    let mut planner = state.planner().lock().await;
    let unavailable = planner.toggle_unavailable(date.clone())?;

    Ok(Json(DateState {
        success: true,
        selected: planner.data().availability.is_selected(&date),
        date,
        unavailable,
    }))
}

/// PUT /selected-dates - Replace the selection
async fn replace_selected(
    State(state): State<AppState>,
    Json(body): Json<SelectedBody>,
) -> Result<Json<CountResponse>, AppError> {
    let mut planner = state.planner().lock().await;
    planner.replace_selected(body.selected_dates)?;

    Ok(Json(CountResponse {
        success: true,
        count: planner.data().availability.selected().len(),
    }))
}

/// POST /selected-dates/{date}/toggle - 409 when the date is blocked
async fn toggle_selected(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DateState>, AppError> {
    let date = date_param(&date)?;
    let selected = state.planner().lock().await.select(date.clone())?;

    Ok(Json(DateState {
        success: true,
        date,
        unavailable: false,
        selected,
    }))
}

#[derive(Serialize)]
pub struct MutualResponse {
    pub success: bool,
    pub dates: Vec<DateKey>,
}

/// GET /mutual-dates - Selected, unblocked, not past; earliest first
async fn mutual_dates(State(state): State<AppState>) -> Json<MutualResponse> {
    let dates = state.planner().lock().await.mutual_dates();
    Json(MutualResponse {
        success: true,
        dates,
    })
}

#[derive(Serialize)]
pub struct PlanResponse {
    pub success: bool,
    pub plan: ConfirmedPlan,
}

/// POST /mutual-dates/{date}/confirm - Promote a selected date to a plan
async fn confirm(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(details): Json<PlanDetails>,
) -> Result<Json<PlanResponse>, AppError> {
    let date = date_param(&date)?;
    let plan = state.planner().lock().await.confirm(&date, details)?;
    tracing::info!(plan_id = %plan.id, date = %plan.date, "plan confirmed");

    Ok(Json(PlanResponse {
        success: true,
        plan,
    }))
}
