//! Page data routes
//!
//! Serve the home and episode props through the regeneration cache. Upstream
//! failures surface as 502 with the API's own status and body attached.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Duration;

use crate::models::EpisodeLookup;
use crate::services::pages::PageError;
use crate::AppState;

/// The home page is a single cache entry
const HOME_KEY: &str = "home";

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

fn cache_control(revalidate: Duration) -> String {
    format!("s-maxage={}, stale-while-revalidate", revalidate.as_secs())
}

fn page_error(err: PageError) -> ErrorResponse {
    match err {
        PageError::Fetch(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "error": "Podcast API request failed",
                "status": e.status(),
                "payload": e.payload(),
            })),
        ),
        PageError::Normalize(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "Episode data is malformed",
                "detail": e.to_string(),
            })),
        ),
    }
}

fn not_found() -> ErrorResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Episode not found"})),
    )
}

/// GET /api/home
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Response, ErrorResponse> {
    let app = Arc::clone(&state);
    let page = state
        .home_cache
        .get_or_generate(HOME_KEY, move || async move { app.pages.home().await })
        .await
        .map_err(page_error)?;

    Ok((
        [(
            header::CACHE_CONTROL,
            cache_control(state.home_cache.revalidate()),
        )],
        Json(&*page),
    )
        .into_response())
}

/// GET /api/episodes/:slug
pub async fn episode(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, ErrorResponse> {
    let (app, key) = (Arc::clone(&state), slug.clone());
    let page = state
        .episode_cache
        .get_or_regenerate(&slug, move || async move {
            app.pages.episode(&key).await.map(|lookup| match lookup {
                EpisodeLookup::Found(page) => Some(page),
                EpisodeLookup::NotFound => None,
            })
        })
        .await
        .map_err(page_error)?
        .ok_or_else(not_found)?;

    Ok((
        [(
            header::CACHE_CONTROL,
            cache_control(state.episode_cache.revalidate()),
        )],
        Json(&*page),
    )
        .into_response())
}
