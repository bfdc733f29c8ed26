use std::env;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use crate::services::normalizer::SiteLocale;

const DEFAULT_EPISODE_CACHE_ENTRIES: NonZeroUsize = match NonZeroUsize::new(500) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Podcast API
    pub api_base_url: String,
    pub episodes_limit: u32,
    pub fetch_timeout_ms: u64,
    pub user_agent: String,

    // Rendering
    pub site_locale: SiteLocale,

    // Regeneration
    pub home_revalidate_secs: u64,
    pub episode_revalidate_secs: u64,
    pub episode_cache_max_entries: NonZeroUsize,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            // Server
            port: parse_or(lookup("PORT"), 3000),

            // Podcast API
            api_base_url: lookup("API_BASE_URL")
                .unwrap_or_else(|| "http://localhost:3333".to_string()),
            episodes_limit: parse_or(lookup("EPISODES_LIMIT"), 12),
            fetch_timeout_ms: parse_or(lookup("FETCH_TIMEOUT_MS"), 10_000), // 10 seconds
            user_agent: lookup("USER_AGENT").unwrap_or_else(|| {
                format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            }),

            // Rendering
            site_locale: parse_or(lookup("SITE_LOCALE"), SiteLocale::EnUs),

            // Regeneration
            home_revalidate_secs: parse_or(lookup("HOME_REVALIDATE_SECS"), 60 * 60 * 8), // 8 hours
            episode_revalidate_secs: parse_or(lookup("EPISODE_REVALIDATE_SECS"), 60 * 60 * 24), // 24 hours
            episode_cache_max_entries: parse_or(
                lookup("EPISODE_CACHE_MAX_ENTRIES"),
                DEFAULT_EPISODE_CACHE_ENTRIES,
            ),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn home_revalidate(&self) -> Duration {
        Duration::from_secs(self.home_revalidate_secs)
    }

    pub fn episode_revalidate(&self) -> Duration {
        Duration::from_secs(self.episode_revalidate_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.api_base_url, "http://localhost:3333");
        assert_eq!(config.episodes_limit, 12);
        assert_eq!(config.site_locale, SiteLocale::EnUs);
        assert_eq!(config.home_revalidate(), Duration::from_secs(28_800));
        assert_eq!(config.episode_revalidate(), Duration::from_secs(86_400));
        assert_eq!(config.episode_cache_max_entries.get(), 500);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert!(config.user_agent.starts_with("podcast-site-server/"));
    }

    #[test]
    fn test_default_port_differs_from_upstream() {
        let config = config_from(&[]);
        let upstream = url::Url::parse(&config.api_base_url).unwrap();
        assert_ne!(upstream.port_or_known_default(), Some(config.port));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("API_BASE_URL", "https://api.example.com/v1"),
            ("EPISODES_LIMIT", "24"),
            ("SITE_LOCALE", "pt-BR"),
            ("HOME_REVALIDATE_SECS", "60"),
            ("EPISODE_CACHE_MAX_ENTRIES", " 10 "),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base_url, "https://api.example.com/v1");
        assert_eq!(config.episodes_limit, 24);
        assert_eq!(config.site_locale, SiteLocale::PtBr);
        assert_eq!(config.home_revalidate_secs, 60);
        assert_eq!(config.episode_cache_max_entries.get(), 10);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = config_from(&[
            ("PORT", "eighty"),
            ("SITE_LOCALE", "klingon"),
            ("EPISODE_CACHE_MAX_ENTRIES", "0"),
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.site_locale, SiteLocale::EnUs);
        assert_eq!(config.episode_cache_max_entries.get(), 500);
    }
}
