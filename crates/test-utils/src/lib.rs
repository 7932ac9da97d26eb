use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use mindscribe::{
    providers::db::storage::{ContentStore, InteractionStore, MoodLogStore, ProfileStore},
    types::{
        CandidateQuery, ContentItem, ContentType, Difficulty, InteractionRecord, MoodLogEntry,
        NewContentItem, NewTask, UserProfile,
    },
    StoreError,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};

// --- Fixtures ---

/// Builds a valid content payload of the given kind.
pub fn content_fixture(title: &str, content_type: ContentType, tags: &[&str]) -> NewContentItem {
    let (body, url) = match content_type {
        ContentType::Video => (None, Some(format!("https://videos.example.com/{}", slug(title)))),
        ContentType::Article | ContentType::Exercise => (Some(format!("About {title}.")), None),
    };
    NewContentItem {
        title: title.to_string(),
        content_type,
        body,
        url,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        source: None,
        estimated_time_minutes: Some(5),
        difficulty: Some(Difficulty::Easy),
    }
}

/// Builds a task worth `points` tagged with the given moods.
pub fn task_fixture(title: &str, points: i64, mood_tags: &[&str]) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: Some(format!("Try: {title}.")),
        points: Some(points),
        mood_tags: mood_tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn slug(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

// --- Tokens ---

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    exp: usize,
}

/// Mints an HS256 bearer token for `user_id`, valid for one hour.
pub fn mint_token(secret: &str, user_id: i64) -> Result<String> {
    mint_token_with_expiry(secret, &user_id.to_string(), Duration::hours(1))
}

/// Mints a token with an arbitrary subject and lifetime. A negative lifetime
/// produces an expired token.
pub fn mint_token_with_expiry(secret: &str, sub: &str, valid_for: Duration) -> Result<String> {
    let claims = TestClaims {
        sub: sub.to_string(),
        exp: (Utc::now() + valid_for).timestamp().max(0) as usize,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

// --- Failing Provider ---

/// A store that fails every read and records which seam was called.
#[derive(Clone, Debug, Default)]
pub struct FailingProvider {
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl FailingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn fail<T>(&self, seam: &'static str) -> Result<T, StoreError> {
        self.calls.lock().unwrap().push(seam);
        Err(StoreError::Connection(format!("{seam} is unavailable")))
    }
}

#[async_trait]
impl ProfileStore for FailingProvider {
    async fn get_profile(&self, _user_id: i64) -> Result<Option<UserProfile>, StoreError> {
        self.fail("profiles")
    }
}

#[async_trait]
impl MoodLogStore for FailingProvider {
    async fn get_latest_mood_log(
        &self,
        _user_id: i64,
    ) -> Result<Option<MoodLogEntry>, StoreError> {
        self.fail("mood_logs")
    }
}

#[async_trait]
impl InteractionStore for FailingProvider {
    async fn get_recent_interactions(
        &self,
        _user_id: i64,
        _limit: usize,
    ) -> Result<Vec<InteractionRecord>, StoreError> {
        self.fail("interactions")
    }
}

#[async_trait]
impl ContentStore for FailingProvider {
    async fn query_content_candidates(
        &self,
        _query: &CandidateQuery,
    ) -> Result<Vec<ContentItem>, StoreError> {
        self.fail("content")
    }
}
