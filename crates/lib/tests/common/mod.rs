#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared setup for the library integration tests: tracing initialization and
//! small builders for the payloads the SQLite provider accepts.

use dotenvy::dotenv;
use mindscribe::{
    providers::db::sqlite::SqliteProvider,
    types::{ContentType, Difficulty, NewContentItem},
};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        tracing_subscriber::fmt::init();
    });
}

/// Creates an isolated in-memory provider with the application schema.
pub async fn setup_provider() -> SqliteProvider {
    setup_tracing();
    let provider = SqliteProvider::new(":memory:")
        .await
        .expect("Failed to create SqliteProvider");
    provider
        .initialize_schema()
        .await
        .expect("Failed to initialize schema");
    provider
}

/// A valid article payload with the given tags.
pub fn article(title: &str, tags: &[&str]) -> NewContentItem {
    NewContentItem {
        title: title.to_string(),
        content_type: ContentType::Article,
        body: Some(format!("Body of {title}")),
        url: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        source: None,
        estimated_time_minutes: None,
        difficulty: None,
    }
}

/// A valid video payload with the given tags.
pub fn video(title: &str, tags: &[&str]) -> NewContentItem {
    NewContentItem {
        title: title.to_string(),
        content_type: ContentType::Video,
        body: None,
        url: Some(format!("https://videos.example.com/{}", title.replace(' ', "-"))),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        source: Some("Example Channel".to_string()),
        estimated_time_minutes: Some(8),
        difficulty: None,
    }
}

/// Returns the payload with its difficulty set.
pub fn with_difficulty(mut item: NewContentItem, difficulty: Difficulty) -> NewContentItem {
    item.difficulty = Some(difficulty);
    item
}
