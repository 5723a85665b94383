// Main entry point - Dependency injection and server setup
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use telemetry_chart::application::chart_service::ChartService;
use telemetry_chart::application::hover_service::HoverReplayService;
use telemetry_chart::infrastructure::config::load_app_config;
use telemetry_chart::presentation::app_state::AppState;
use telemetry_chart::presentation::handlers::{
    health_check, hover_chart, list_field_presets, prepare_chart, replay_hover,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create services (application layer)
    let chart_service = ChartService::new(
        app_config.chart.display_defaults(),
        app_config.fields.clone(),
    );
    let hover_service = HoverReplayService::new(app_config.chart.debounce());

    // Create application state
    let state = Arc::new(AppState {
        chart_service,
        hover_service,
        compress_responses: app_config.chart.compress_responses,
    });

    // Build router (presentation layer)
    // JSON bodies are compressed in the response builders, so no
    // CompressionLayer here.
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/fields/presets", get(list_field_presets))
        .route("/api/chart/prepare", post(prepare_chart))
        .route("/api/chart/hover", post(hover_chart))
        .route("/api/chart/hover/replay", post(replay_hover))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = app_config.server.socket_addr()?;
    tracing::info!("Starting telemetry-chart service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
