// HTTP request handlers
use crate::application::hover_service::{PointerAction, PointerEvent};
use crate::application::interaction::HoverLabeler;
use crate::domain::display::{DisplayConfig, DisplayOverrides};
use crate::domain::geometry::HoverState;
use crate::domain::telemetry::Sample;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_REPLAY_EVENTS: usize = 10_000;
const MAX_REPLAY_SPAN_MS: u64 = 60_000;

#[derive(Debug, Deserialize)]
pub struct ChartRequest {
    #[serde(default)]
    pub series: Vec<Sample>,
    /// Field preset to take color and unit from
    pub field: Option<String>,
    #[serde(default)]
    pub config: DisplayOverrides,
}

#[derive(Debug, Deserialize)]
pub struct HoverRequest {
    #[serde(flatten)]
    pub chart: ChartRequest,
    pub x: f64,
    /// Rendered surface width when `x` is in surface pixels
    pub surface_width: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ReplayRequest {
    #[serde(flatten)]
    pub chart: ChartRequest,
    #[serde(default)]
    pub events: Vec<PointerEvent>,
    pub surface_width: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct HoverResponse {
    pub hover: Option<HoverState>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the configured field presets
pub async fn list_field_presets(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(state.chart_service.presets(), &headers, &state).await
}

/// Prepare chart geometry for a series
pub async fn prepare_chart(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChartRequest>,
) -> Result<Response, ApiError> {
    let config = resolve_config(&state, &request)?;
    let geometry = state.chart_service.prepare(&request.series, &config);
    Ok(respond(&*geometry, &headers, &state).await)
}

/// Hit-test a single pointer position
pub async fn hover_chart(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<HoverRequest>,
) -> Result<Response, ApiError> {
    validate_pointer(request.x, request.surface_width)?;
    let config = resolve_config(&state, &request.chart)?;
    let geometry = state.chart_service.prepare(&request.chart.series, &config);

    let hover = state.hover_service.hover_at(
        &geometry,
        &HoverLabeler::from_config(&config),
        request.x,
        request.surface_width,
    );
    Ok(respond(&HoverResponse { hover }, &headers, &state).await)
}

/// Replay pointer events and stream debounced hover frames
pub async fn replay_hover(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReplayRequest>,
) -> Result<Response, ApiError> {
    validate_replay(&request)?;
    let config = resolve_config(&state, &request.chart)?;
    let geometry = state.chart_service.prepare(&request.chart.series, &config);

    let rx = state.hover_service.replay(
        geometry,
        HoverLabeler::from_config(&config),
        request.events,
        request.surface_width,
    );
    Ok(stream_from_receiver(rx).into_response())
}

async fn respond<T: Serialize + ?Sized>(data: &T, headers: &HeaderMap, state: &AppState) -> Response {
    let compress = state.compress_responses && accepts_brotli(headers);
    match json_response(data, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

fn resolve_config(state: &AppState, request: &ChartRequest) -> Result<DisplayConfig, ApiError> {
    let config = state
        .chart_service
        .resolve_config(request.field.as_deref(), request.config.clone());
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &DisplayConfig) -> Result<(), ApiError> {
    if !config.height.is_finite() || config.height <= 0.0 {
        return Err(ApiError::InvalidConfig(format!(
            "height must be a positive number, got {}",
            config.height
        )));
    }
    if config.max_data_points == 0 {
        return Err(ApiError::InvalidConfig(
            "max_data_points must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_pointer(x: f64, surface_width: Option<f64>) -> Result<(), ApiError> {
    if !x.is_finite() {
        return Err(ApiError::InvalidPointer(format!("x must be finite, got {}", x)));
    }
    match surface_width {
        Some(width) if !width.is_finite() || width <= 0.0 => Err(ApiError::InvalidPointer(
            format!("surface_width must be positive, got {}", width),
        )),
        _ => Ok(()),
    }
}

fn validate_replay(request: &ReplayRequest) -> Result<(), ApiError> {
    if request.events.len() > MAX_REPLAY_EVENTS {
        return Err(ApiError::InvalidReplay(format!(
            "at most {} events per replay",
            MAX_REPLAY_EVENTS
        )));
    }
    if request.events.iter().any(|e| e.at_ms > MAX_REPLAY_SPAN_MS) {
        return Err(ApiError::InvalidReplay(format!(
            "events must fall within {} ms",
            MAX_REPLAY_SPAN_MS
        )));
    }
    for event in &request.events {
        if let PointerAction::Move { x } = event.action {
            validate_pointer(x, request.surface_width)?;
        }
    }
    Ok(())
}
