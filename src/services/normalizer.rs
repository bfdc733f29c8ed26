//! Episode normalization
//!
//! Turns API records into the [`Episode`] shape the pages render: localized
//! publication date, whole-second duration and its `HHhMMmSSs` label.

use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::str::FromStr;

use crate::models::Episode;
use crate::services::duration::format_duration;
use crate::services::podcast_api::{RawDuration, RawEpisode};

/// Display pattern for publication dates ("5 Jan 24")
const PUBLISHED_AT_FORMAT: &str = "%-d %b %y";

/// Offset date-time layouts accepted besides RFC 3339
///
/// `%#z` takes `Z`, `+00`, `+0000` and `+00:00`.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Naive date-time layouts accepted besides RFC 3339
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Locales the site can render dates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteLocale {
    #[default]
    EnUs,
    PtBr,
}

impl SiteLocale {
    fn chrono_locale(self) -> Locale {
        match self {
            SiteLocale::EnUs => Locale::en_US,
            SiteLocale::PtBr => Locale::pt_BR,
        }
    }
}

impl FromStr for SiteLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en" | "en-us" => Ok(SiteLocale::EnUs),
            "pt" | "pt-br" => Ok(SiteLocale::PtBr),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

impl std::fmt::Display for SiteLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteLocale::EnUs => write!(f, "en-US"),
            SiteLocale::PtBr => write!(f, "pt-BR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("invalid ISO-8601 date: {0:?}")]
    InvalidDate(String),
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),
    #[error("negative duration: {0}")]
    NegativeDuration(String),
}

/// Maps raw API records to display episodes
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    locale: SiteLocale,
}

impl Normalizer {
    pub fn new(locale: SiteLocale) -> Self {
        Self { locale }
    }

    /// Listing shape: everything except the description
    pub fn summary(&self, raw: &RawEpisode) -> Result<Episode, NormalizeError> {
        let published_at = self.format_published_at(&raw.published_at)?;
        let duration = coerce_duration(&raw.file.duration)?;

        Ok(Episode {
            id: raw.id.clone(),
            title: raw.title.clone(),
            thumbnail: raw.thumbnail.clone(),
            members: raw.members.clone(),
            published_at,
            duration,
            duration_as_string: format_duration(duration),
            description: None,
            url: raw.file.url.clone(),
        })
    }

    /// Detail shape: the listing shape plus the HTML description
    pub fn detail(&self, raw: &RawEpisode) -> Result<Episode, NormalizeError> {
        let mut episode = self.summary(raw)?;
        episode.description = Some(raw.description.clone());
        Ok(episode)
    }

    pub fn summaries(&self, raws: &[RawEpisode]) -> Result<Vec<Episode>, NormalizeError> {
        raws.iter().map(|raw| self.summary(raw)).collect()
    }

    pub fn format_published_at(&self, value: &str) -> Result<String, NormalizeError> {
        let wall_clock = parse_published_at(value)?;
        // The written calendar date is kept; the UTC wrapper only enables localized formatting
        Ok(Utc
            .from_utc_datetime(&wall_clock)
            .format_localized(PUBLISHED_AT_FORMAT, self.locale.chrono_locale())
            .to_string())
    }
}

/// Parse an ISO-8601 date, keeping the wall-clock time as written
pub fn parse_published_at(value: &str) -> Result<NaiveDateTime, NormalizeError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Ok(dt.naive_local());
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| NormalizeError::InvalidDate(value.to_string()))
}

/// Whole seconds from a numeric or string-encoded duration
///
/// Fractions are truncated. Empty or non-numeric text, NaN and infinities are
/// rejected, as is anything below zero.
pub fn coerce_duration(raw: &RawDuration) -> Result<u64, NormalizeError> {
    match raw {
        RawDuration::Integer(n) => from_integer(*n, &n.to_string()),
        RawDuration::Float(f) => from_float(*f, &f.to_string()),
        RawDuration::Text(text) => {
            let trimmed = text.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return from_integer(n, text);
            }
            match trimmed.parse::<f64>() {
                Ok(f) => from_float(f, text),
                Err(_) => Err(NormalizeError::InvalidDuration(text.clone())),
            }
        }
    }
}

fn from_integer(n: i64, original: &str) -> Result<u64, NormalizeError> {
    u64::try_from(n).map_err(|_| NormalizeError::NegativeDuration(original.to_string()))
}

fn from_float(f: f64, original: &str) -> Result<u64, NormalizeError> {
    if !f.is_finite() {
        return Err(NormalizeError::InvalidDuration(original.to_string()));
    }
    if f < 0.0 {
        return Err(NormalizeError::NegativeDuration(original.to_string()));
    }
    Ok(f.trunc() as u64)
}
