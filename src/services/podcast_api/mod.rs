//! Podcast API Integration
//!
//! Client for the JSON API that stores the episode catalogue.
//!
//! # Endpoints
//!
//! ```text
//! GET {base}/episodes?_limit=12&_sort=published_at&_order=desc
//! GET {base}/episodes/{slug}
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::services::podcast_api::{ApiClient, EpisodeSource};
//!
//! let client = ApiClient::new("http://localhost:3333", "podcast-site-server", timeout)?;
//! match client.episode_by_slug("a-importancia-da-contribuicao-em-open-source").await {
//!     Ok(raw) => { /* normalize */ }
//!     Err(e) if e.is_not_found() => { /* 404 page */ }
//!     Err(e) => { /* e.payload() holds the API's error body, if any */ }
//! }
//! ```

pub mod client;
pub mod types;

pub use client::{ApiClient, EpisodeSource, FetchError};
pub use types::{RawDuration, RawEpisode};
