mod config;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_support;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::models::{EpisodePage, HomeData};
use crate::services::{
    normalizer::Normalizer,
    page_cache::PageCache,
    pages::PageData,
    podcast_api::{ApiClient, FetchError},
};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub pages: PageData<ApiClient>,
    pub home_cache: PageCache<HomeData>,
    pub episode_cache: PageCache<EpisodePage>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, FetchError> {
        let client = ApiClient::new(
            &config.api_base_url,
            &config.user_agent,
            config.fetch_timeout(),
        )?
        .with_list_limit(config.episodes_limit);

        Ok(Self {
            pages: PageData::new(client, Normalizer::new(config.site_locale)),
            home_cache: PageCache::new(
                "home",
                config.home_revalidate(),
                std::num::NonZeroUsize::MIN,
            ),
            episode_cache: PageCache::new(
                "episode",
                config.episode_revalidate(),
                config.episode_cache_max_entries,
            ),
            config,
            start_time: Instant::now(),
        })
    }
}

/// Build the router with all routes and middleware
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/live", get(routes::health::live))
        // Page data endpoints
        .route("/api/home", get(routes::episodes::home))
        .route("/api/episodes/:slug", get(routes::episodes::episode))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podcast_site_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting Podcast Site Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Podcast API: {}", config.api_base_url);
    tracing::info!(
        "Revalidation: home every {}s, episodes every {}s",
        config.home_revalidate_secs,
        config.episode_revalidate_secs
    );

    let state = Arc::new(AppState::new(config)?);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
