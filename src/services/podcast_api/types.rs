//! Podcast API Types
//!
//! Record shapes returned by the episodes endpoints, kept as close to the wire
//! format as possible. Display shaping happens in the normalizer.

use serde::{Deserialize, Deserializer, Serialize};

/// Default page size for the episode listing
pub const DEFAULT_LIST_LIMIT: u32 = 12;

// ============================================================================
// Episode Records
// ============================================================================

/// Episode as stored by the remote API
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RawEpisode {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub members: String,
    /// ISO-8601 publication date
    pub published_at: String,
    /// HTML body, only rendered on the detail page
    #[serde(default)]
    pub description: String,
    pub file: RawFile,
}

/// Audio file attached to an episode
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RawFile {
    pub url: String,
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
    pub duration: RawDuration,
}

/// Duration in seconds, which the API emits either as a number or as text
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawDuration {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Integer(n) => n.to_string(),
        Id::Float(f) => f.to_string(),
    })
}

// ============================================================================
// Listing Query
// ============================================================================

/// Query parameters for the episode listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub sort: String,
    pub descending: bool,
}

impl ListQuery {
    /// Newest episodes first
    pub fn latest(limit: u32) -> Self {
        Self {
            limit,
            sort: "published_at".to_string(),
            descending: true,
        }
    }

    /// Render as `_limit`, `_sort`, `_order` query pairs
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("_limit", self.limit.to_string()),
            ("_sort", self.sort.clone()),
            ("_order", if self.descending { "desc" } else { "asc" }.to_string()),
        ]
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::latest(DEFAULT_LIST_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode_json(id: serde_json::Value, duration: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": "Faladev #30 | Desenvolvimento mobile",
            "members": "Diego e Richard",
            "published_at": "2021-01-22 12:00:00",
            "thumbnail": "https://storage.example.com/thumb.jpg",
            "description": "<p>Neste episódio</p>",
            "file": {
                "url": "https://storage.example.com/audio.m4a",
                "type": "audio/x-m4a",
                "duration": duration
            }
        })
    }

    #[test]
    fn test_raw_episode_numeric_duration() {
        let raw: RawEpisode =
            serde_json::from_value(episode_json("faladev-30".into(), 3981.into())).unwrap();
        assert_eq!(raw.id, "faladev-30");
        assert_eq!(raw.file.duration, RawDuration::Integer(3981));
        assert_eq!(raw.file.mime_type.as_deref(), Some("audio/x-m4a"));
    }

    #[test]
    fn test_raw_episode_text_duration() {
        let raw: RawEpisode =
            serde_json::from_value(episode_json("faladev-30".into(), "125".into())).unwrap();
        assert_eq!(raw.file.duration, RawDuration::Text("125".to_string()));
    }

    #[test]
    fn test_raw_episode_float_duration() {
        let raw: RawEpisode =
            serde_json::from_value(episode_json("a".into(), serde_json::json!(61.5))).unwrap();
        assert_eq!(raw.file.duration, RawDuration::Float(61.5));
    }

    #[test]
    fn test_raw_episode_numeric_id() {
        let raw: RawEpisode =
            serde_json::from_value(episode_json(42.into(), 10.into())).unwrap();
        assert_eq!(raw.id, "42");
    }

    #[test]
    fn test_raw_episode_missing_description() {
        let mut value = episode_json("a".into(), 10.into());
        value.as_object_mut().unwrap().remove("description");
        let raw: RawEpisode = serde_json::from_value(value).unwrap();
        assert!(raw.description.is_empty());
    }

    #[test]
    fn test_list_query_params() {
        let params = ListQuery::default().to_params();
        assert_eq!(
            params,
            vec![
                ("_limit", "12".to_string()),
                ("_sort", "published_at".to_string()),
                ("_order", "desc".to_string()),
            ]
        );
    }
}
