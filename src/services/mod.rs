pub mod duration;
pub mod metrics;
pub mod normalizer;
pub mod page_cache;
pub mod pages;
pub mod podcast_api;
