use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Requests sent to the podcast API, by endpoint and outcome
    pub static ref UPSTREAM_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "podcast_upstream_requests_total",
        "Requests sent to the podcast API",
        &["endpoint", "outcome"]
    )
    .unwrap();

    /// Page regenerations, by page and outcome
    pub static ref PAGE_REGENERATIONS: IntCounterVec = register_int_counter_vec!(
        "podcast_page_regenerations_total",
        "Page data regenerations",
        &["page", "outcome"]
    )
    .unwrap();
}

pub fn record_upstream(endpoint: &str, outcome: &str) {
    UPSTREAM_REQUESTS
        .with_label_values(&[endpoint, outcome])
        .inc();
}

pub fn record_regeneration(page: &str, outcome: &str) {
    PAGE_REGENERATIONS.with_label_values(&[page, outcome]).inc();
}
