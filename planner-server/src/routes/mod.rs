pub mod activities;
pub mod availability;
pub mod data;
pub mod patterns;
pub mod plans;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use planner_core::{DateKey, PlannerError};
use serde::Serialize;

use crate::state::AppState;

/// Every API route, mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .merge(data::router())
            .merge(availability::router())
            .merge(plans::router())
            .merge(patterns::router())
            .merge(activities::router()),
    )
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Convert errors to HTTP responses, picking the status from planner errors
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<PlannerError>() {
            Some(PlannerError::Validation(_)) => StatusCode::BAD_REQUEST,
            Some(PlannerError::NotFound(_)) => StatusCode::NOT_FOUND,
            Some(PlannerError::UnavailableDate(_)) => StatusCode::CONFLICT,
            Some(PlannerError::Persistence { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "request rejected");
        }

        let body = Json(ErrorResponse {
            success: false,
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Parse a `{date}` path segment.
pub fn date_param(raw: &str) -> Result<DateKey, AppError> {
    Ok(DateKey::parse(raw)?)
}

/// Body shared by the simple "it worked" responses.
#[derive(Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: &'static str,
}

impl Ack {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Ack {
            success: true,
            message,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use planner_core::{ExportOptions, MemoryStore, Planner};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::state::AppState;

    pub fn app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let planner = Planner::load(Box::new(store.clone())).unwrap();
        let app = super::router().with_state(AppState::new(planner, ExportOptions::default()));
        (app, store)
    }

    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, bytes) = send_raw(app, method, uri, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn send_raw(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, bytes.to_vec())
    }
}
