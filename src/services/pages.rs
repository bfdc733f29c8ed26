//! Page data providers
//!
//! Build the props for the home page and the episode detail page from the
//! podcast API. Each call is a one-shot fetch and normalize; keeping results
//! around between regenerations is the page cache's job.

use chrono::Utc;
use tracing::{debug, info};

use crate::models::{EpisodeLookup, EpisodePage, HomeData};
use crate::services::normalizer::{NormalizeError, Normalizer};
use crate::services::podcast_api::{EpisodeSource, FetchError};

/// Episodes featured as cards at the top of the home page
pub const LATEST_EPISODES_COUNT: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("podcast API request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("episode data is malformed: {0}")]
    Normalize(#[from] NormalizeError),
}

pub struct PageData<S> {
    source: S,
    normalizer: Normalizer,
}

impl<S: EpisodeSource> PageData<S> {
    pub fn new(source: S, normalizer: Normalizer) -> Self {
        Self { source, normalizer }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Home page props: the newest two episodes, then the rest
    ///
    /// Order comes from the API (newest first) and is never changed here.
    pub async fn home(&self) -> Result<HomeData, PageError> {
        let raws = self.source.list_episodes().await?;
        let mut latest_episodes = self.normalizer.summaries(&raws)?;
        let all_episodes =
            latest_episodes.split_off(LATEST_EPISODES_COUNT.min(latest_episodes.len()));

        info!(
            "Home page data generated: {} latest, {} more",
            latest_episodes.len(),
            all_episodes.len()
        );

        Ok(HomeData {
            latest_episodes,
            all_episodes,
            generated_at: Utc::now(),
        })
    }

    /// Episode page props, or `NotFound` when the API has no such episode
    pub async fn episode(&self, slug: &str) -> Result<EpisodeLookup, PageError> {
        if is_unroutable_slug(slug) {
            debug!("Rejecting unroutable slug {:?}", slug);
            return Ok(EpisodeLookup::NotFound);
        }

        let raw = match self.source.episode_by_slug(slug).await {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => {
                info!("Episode not found: {}", slug);
                return Ok(EpisodeLookup::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        let episode = self.normalizer.detail(&raw)?;
        info!("Episode page data generated: {}", slug);

        Ok(EpisodeLookup::Found(EpisodePage {
            episode,
            generated_at: Utc::now(),
        }))
    }
}

/// Slugs that cannot name a single path segment below `/episodes`
fn is_unroutable_slug(slug: &str) -> bool {
    slug.trim().is_empty() || slug == "." || slug == ".."
}
