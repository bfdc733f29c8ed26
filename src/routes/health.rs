use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Root endpoint - basic status
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Podcast Site Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "runtime": "rust"
    }))
}

/// Pages currently held by the regeneration cache
#[derive(Serialize)]
struct CachedPages {
    home: usize,
    episodes: usize,
}

/// Health check response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    uptime: u64,
    upstream: String,
    locale: String,
    cached_pages: CachedPages,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        upstream: state.pages.source().base_url().to_string(),
        locale: state.config.site_locale.to_string(),
        cached_pages: CachedPages {
            home: state.home_cache.len().await,
            episodes: state.episode_cache.len().await,
        },
    };

    Json(health)
}

/// GET /metrics - Prometheus metrics
pub async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                b"Internal Server Error".to_vec(),
            )
        }
    }
}

/// Liveness probe
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}
