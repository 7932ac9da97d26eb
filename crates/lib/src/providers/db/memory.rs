//! # In-Process Provider
//!
//! A provider that keeps every record in process memory. It implements the same
//! read seams as [`SqliteProvider`](super::sqlite::SqliteProvider) with the same
//! ordering rules, which makes it a fast stand-in for engine tests and for
//! ephemeral runs that do not need a database file.

use crate::{
    errors::StoreError,
    providers::db::storage::{ContentStore, InteractionStore, MoodLogStore, ProfileStore},
    tags::overlaps,
    types::{CandidateQuery, ContentItem, InteractionRecord, MoodLogEntry, UserProfile},
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    fmt::{self, Debug},
    sync::Arc,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    content: Vec<ContentItem>,
    profiles: HashMap<i64, UserProfile>,
    mood_logs: Vec<MoodLogEntry>,
    interactions: HashMap<(i64, i64), InteractionRecord>,
}

/// An in-memory provider. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a content item, keyed by its id.
    pub async fn put_content(&self, item: ContentItem) {
        let mut tables = self.tables.write().await;
        tables.content.retain(|c| c.id != item.id);
        tables.content.push(item);
    }

    /// Adds or replaces a user's profile.
    pub async fn put_profile(&self, profile: UserProfile) {
        self.tables
            .write()
            .await
            .profiles
            .insert(profile.user_id, profile);
    }

    /// Appends a mood log.
    pub async fn add_mood_log(&self, entry: MoodLogEntry) {
        self.tables.write().await.mood_logs.push(entry);
    }

    /// Adds or replaces the record for the (user, item) pair.
    pub async fn put_interaction(&self, record: InteractionRecord) {
        self.tables
            .write()
            .await
            .interactions
            .insert((record.user_id, record.content_item_id), record);
    }
}

impl Debug for MemoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl ProfileStore for MemoryProvider {
    async fn get_profile(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.tables.read().await.profiles.get(&user_id).cloned())
    }
}

#[async_trait]
impl MoodLogStore for MemoryProvider {
    async fn get_latest_mood_log(
        &self,
        user_id: i64,
    ) -> Result<Option<MoodLogEntry>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .mood_logs
            .iter()
            .filter(|m| m.user_id == user_id)
            .max_by_key(|m| (m.logged_at, m.created_at, m.id))
            .cloned())
    }
}

#[async_trait]
impl InteractionStore for MemoryProvider {
    async fn get_recent_interactions(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>, StoreError> {
        let tables = self.tables.read().await;
        let mut records: Vec<InteractionRecord> = tables
            .interactions
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.viewed_at
                .cmp(&a.viewed_at)
                .then(b.content_item_id.cmp(&a.content_item_id))
        });
        records.truncate(limit);
        Ok(records)
    }
}

#[async_trait]
impl ContentStore for MemoryProvider {
    async fn query_content_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<ContentItem>, StoreError> {
        let tables = self.tables.read().await;
        let mut items: Vec<&ContentItem> = tables
            .content
            .iter()
            .filter(|c| !query.exclude_ids.contains(&c.id))
            .filter(|c| match &query.tags_overlap_any {
                Some(tags) => overlaps(&c.tags, tags),
                None => true,
            })
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(items.into_iter().take(query.limit).cloned().collect())
    }
}
