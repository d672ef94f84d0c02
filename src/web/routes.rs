use super::Result;
use crate::activity::ActivityTracker;
use crate::config::ExporterConfig;
use crate::core::FileMetrics;
use crate::metrics::FileMetricsRegistry;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Shared handler state. Built once at startup, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<FileMetricsRegistry>,
    pub tracker: Arc<ActivityTracker>,
}

impl AppState {
    pub fn new(config: &ExporterConfig) -> crate::core::Result<Self> {
        let metrics = Arc::new(FileMetricsRegistry::new()?);
        let sink = Arc::new(metrics.activity_sink());
        let tracker = Arc::new(ActivityTracker::new(sink, config.idle_timeout));
        Ok(Self { metrics, tracker })
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<u64>,
}

const UPDATED: &str = "Metrics updated";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/track-file/", post(track_file))
        .route("/real-time-stats/", post(real_time_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Prometheus scrape endpoint.
async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.metrics.encode_text()?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

async fn track_file(
    State(state): State<AppState>,
    Json(body): Json<FileMetrics>,
) -> Result<Json<UpdateResponse>> {
    body.validate()?;
    state.metrics.track_file(&body)?;

    Ok(Json(UpdateResponse {
        message: UPDATED,
        active: None,
    }))
}

/// Counts the report as one unit of live activity for the script.
async fn real_time_stats(
    State(state): State<AppState>,
    Json(body): Json<FileMetrics>,
) -> Result<Json<UpdateResponse>> {
    body.validate()?;
    let active = state.tracker.record(&body.activity_event());
    debug!(
        script_name = %body.script_name,
        file_name = %body.file_name,
        active,
        "activity recorded"
    );

    Ok(Json(UpdateResponse {
        message: UPDATED,
        active: Some(active),
    }))
}
