//! Podcast API Client
//!
//! HTTP client for the episodes endpoints. Every call is a single attempt;
//! failures come back as [`FetchError`] values that still carry whatever body
//! the API sent, so callers decide what an error response means for them.

use super::types::*;
use crate::services::metrics;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Longest slice of an undecodable body written to the debug log
const LOGGED_BODY_CHARS: usize = 500;

/// Read access to the episode catalogue
///
/// Implemented by [`ApiClient`]; page providers are generic over it so they can
/// run against in-memory sources.
pub trait EpisodeSource: Send + Sync {
    /// Newest episodes first, limited to one listing page
    fn list_episodes(&self) -> impl Future<Output = Result<Vec<RawEpisode>, FetchError>> + Send;

    /// A single episode by its slug
    fn episode_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<RawEpisode, FetchError>> + Send;
}

/// Podcast API Client
///
/// Bound to one base URL; all paths are resolved relative to it.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    list_query: ListQuery,
}

impl ApiClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "http://localhost:3333" or "https://example.com/api")
    /// * `user_agent` - User-Agent header sent with every request
    /// * `timeout` - Whole-request timeout
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(format!(
                "{}: not usable as a base URL",
                base_url
            )));
        }

        // Url::join replaces the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            list_query: ListQuery::default(),
        })
    }

    /// Override the listing page size
    pub fn with_list_limit(mut self, limit: u32) -> Self {
        self.list_query.limit = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Make a GET request and decode the JSON body
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;

        debug!("Podcast API request: {} {:?}", url, query);

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                payload: error_payload(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to decode podcast API response for '{}': {}", path, e);
            debug!(
                "Response text: {}",
                text.chars().take(LOGGED_BODY_CHARS).collect::<String>()
            );
            FetchError::Decode(e.to_string())
        })
    }
}

impl EpisodeSource for ApiClient {
    async fn list_episodes(&self) -> Result<Vec<RawEpisode>, FetchError> {
        let result = self.get("episodes", &self.list_query.to_params()).await;
        metrics::record_upstream("list", outcome(&result));
        result
    }

    async fn episode_by_slug(&self, slug: &str) -> Result<RawEpisode, FetchError> {
        let path = format!("episodes/{}", urlencoding::encode(slug));
        let result = self.get(&path, &[]).await;
        metrics::record_upstream("detail", outcome(&result));
        result
    }
}

fn outcome<T>(result: &Result<T, FetchError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

/// Error bodies are kept as JSON when they parse, as plain text otherwise
fn error_payload(text: &str) -> Option<serde_json::Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        serde_json::from_str(trimmed)
            .unwrap_or_else(|_| serde_json::Value::String(trimmed.to_string())),
    )
}

/// Podcast API error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Base URL or request path could not be turned into a URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    /// Network/connection error, no response received
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx response, with the body the API sent
    #[error("HTTP error: {status}")]
    Status {
        status: u16,
        payload: Option<serde_json::Value>,
    },
    /// 2xx response whose body is not the expected shape
    #[error("Parse error: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Body of the error response, if the API sent one
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            FetchError::Status { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl(_) => "invalid_url",
            FetchError::Network(_) => "network_error",
            FetchError::Status { .. } => "http_error",
            FetchError::Decode(_) => "decode_error",
        }
    }
}
