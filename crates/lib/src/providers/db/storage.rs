//! # Storage Seams
//!
//! The read-only interfaces the recommendation engine consumes. Each collaborator
//! store gets its own trait so an engine caller only has to provide what is read,
//! and so tests can swap any one of them out.

use crate::{
    errors::StoreError,
    types::{CandidateQuery, ContentItem, InteractionRecord, MoodLogEntry, UserProfile},
};
use async_trait::async_trait;

/// Read access to user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the user's profile, or `None` if it was never created.
    async fn get_profile(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError>;
}

/// Read access to mood logs.
#[async_trait]
pub trait MoodLogStore: Send + Sync {
    /// Returns the user's most recent mood log by `logged_at`.
    async fn get_latest_mood_log(&self, user_id: i64)
        -> Result<Option<MoodLogEntry>, StoreError>;
}

/// Read access to user/content interactions.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Returns up to `limit` interactions of the user, most recently viewed first.
    async fn get_recent_interactions(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>, StoreError>;
}

/// Read access to the content catalogue.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Returns up to `query.limit` items, most recently updated first, that
    /// satisfy the query's tag overlap and exclusion filters.
    async fn query_content_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<ContentItem>, StoreError>;
}
