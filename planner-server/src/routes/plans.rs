//! Confirmed plan endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{delete, get, post},
};
use planner_core::{NewPlan, export_filename, generate_plan_ics};

use crate::routes::availability::PlanResponse;
use crate::routes::{Ack, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/confirmed-plans", post(create_plan))
        .route("/confirmed-plans/{id}", delete(delete_plan))
        .route("/confirmed-plans/{id}/ics", get(export_plan))
}

/// POST /confirmed-plans - Record a plan directly
async fn create_plan(
    State(state): State<AppState>,
    Json(request): Json<NewPlan>,
) -> Result<Json<PlanResponse>, AppError> {
    let plan = state.planner().lock().await.create_plan(request)?;
    tracing::info!(plan_id = %plan.id, date = %plan.date, "plan created");

    Ok(Json(PlanResponse {
        success: true,
        plan,
    }))
}

/// DELETE /confirmed-plans/{id}
async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, AppError> {
    state.planner().lock().await.delete_plan(&id)?;

    Ok(Ack::new("Plan deleted successfully"))
}

/// GET /confirmed-plans/{id}/ics - One-event calendar file
async fn export_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let plan = state.planner().lock().await.plan(&id)?.clone();
    let body = generate_plan_ics(&plan, state.export_options())?;
    let disposition = format!("attachment; filename=\"{}\"", export_filename(&plan));

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, send, send_raw};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn create_applies_defaults_and_delete_removes() {
        let (app, store) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/confirmed-plans",
            Some(json!({ "activity": "Picnic", "date": "2025-07-04" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let plan = &body["plan"];
        assert_eq!(plan["time"], "TBD");
        assert_eq!(plan["location"], "");
        assert_eq!(plan["endTime"], "21:00");
        assert_eq!(plan["confirmed"], true);
        assert_eq!(store.saved().unwrap().confirmed_plans.len(), 1);

        let uri = format!("/api/confirmed-plans/{}", plan["id"].as_str().unwrap());
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn create_requires_activity_and_date() {
        let (app, _) = app();
        let (status, _) = send(
            &app,
            "POST",
            "/api/confirmed-plans",
            Some(json!({ "activity": "Picnic" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn export_of_unknown_plan_is_not_found() {
        let (app, _) = app();
        let (status, _, _) = send_raw(&app, "GET", "/api/confirmed-plans/nope/ics", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn export_names_the_download() {
        let (app, _) = app();
        let (_, body) = send(
            &app,
            "POST",
            "/api/confirmed-plans",
            Some(json!({ "activity": "Movie Night", "date": "2025-06-10" })),
        )
        .await;

        let uri = format!("/api/confirmed-plans/{}/ics", body["plan"]["id"].as_str().unwrap());
        let (_, headers, bytes) = send_raw(&app, "GET", &uri, None).await;

        let disposition = headers["content-disposition"].to_str().unwrap();
        assert!(disposition.contains("plan-movie-night-2025-06-10.ics"));
        let ics = String::from_utf8(bytes).unwrap();
        assert_eq!(ics.matches("BEGIN:VALARM").count(), 1);
        assert!(!ics.contains("LOCATION"));
    }
}
