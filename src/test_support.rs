//! Shared fixtures for tests: episode records and an in-process upstream API.

use axum::Router;
use serde_json::Value;

use crate::services::podcast_api::RawEpisode;

/// Episode record as the API sends it; higher indexes are older
pub fn raw_episode_json(index: usize) -> Value {
    serde_json::json!({
        "id": format!("episode-{}", index),
        "title": format!("Episode {}", index),
        "members": "Diego e Richard",
        "published_at": format!("2024-01-{:02}T10:00:00.000Z", 28 - index.min(27)),
        "thumbnail": format!("https://cdn.example.com/thumbs/{}.jpg", index),
        "description": format!("<p>Show notes {}</p>", index),
        "file": {
            "url": format!("https://cdn.example.com/audio/{}.m4a", index),
            "type": "audio/x-m4a",
            "duration": (index as u64 + 1) * 60
        }
    })
}

pub fn raw_episode(index: usize) -> RawEpisode {
    serde_json::from_value(raw_episode_json(index)).expect("fixture is a valid episode")
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test upstream");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on
pub async fn refused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    format!("http://{}", addr)
}
