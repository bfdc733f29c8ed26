use chrono::{DateTime, Utc};
use serde::Serialize;

/// Display-ready episode handed to rendering and playback
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub members: String,
    /// Localized `d MMM yy` date, e.g. "5 Jan 24"
    pub published_at: String,
    /// Length in seconds
    pub duration: u64,
    /// `HHhMMmSSs` rendering of `duration`
    pub duration_as_string: String,
    /// HTML show notes, detail page only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Audio stream URL
    pub url: String,
}

/// Props for the home page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeData {
    /// The two most recent episodes, shown as cards
    pub latest_episodes: Vec<Episode>,
    /// Everything after them, in API order
    pub all_episodes: Vec<Episode>,
    pub generated_at: DateTime<Utc>,
}

/// Props for an episode detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodePage {
    pub episode: Episode,
    pub generated_at: DateTime<Utc>,
}

/// Outcome of resolving an episode slug
#[derive(Debug, Clone, PartialEq)]
pub enum EpisodeLookup {
    Found(EpisodePage),
    NotFound,
}
