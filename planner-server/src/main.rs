mod routes;
mod singleton;
mod state;

use anyhow::{Context, Result};
use axum::Router;
use planner_core::{FallbackStore, JsonFileStore, Planner, PlannerConfig};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = PlannerConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Ensure only one instance writes this data file
    let _lock = singleton::acquire_lock(&config.data_file)?;

    let store = FallbackStore::new(
        Box::new(JsonFileStore::new(&config.data_file)),
        Box::new(JsonFileStore::new(&config.cache_file)),
    );
    let planner = Planner::load(Box::new(store))
        .context("Failed to load planner data")?
        .with_horizon_days(config.horizon_days);
    let state = AppState::new(planner, config.export.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::router())
        .with_state(state)
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    tracing::info!(
        address = %config.bind_address,
        data_file = %config.data_file.display(),
        "planner-server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
