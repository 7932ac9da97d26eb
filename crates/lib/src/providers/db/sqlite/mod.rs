use crate::{
    errors::StoreError,
    providers::db::storage::{ContentStore, InteractionStore, MoodLogStore, ProfileStore},
    tags::overlaps,
    types::{
        CandidateQuery, ContentItem, ContentType, Difficulty, InteractionRecord, MoodLogEntry,
        Task, TaskCompletion, TaskProgress, UserProfile,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::{
    fmt::{self, Debug},
    str::FromStr,
};
use tracing::{debug, info, warn};
use turso::{Connection, Database, Row, Value as TursoValue};

mod activity;
mod content;
pub mod sql;
mod tasks;

/// A provider for the application tables in a local SQLite database using Turso.
///
/// The provider holds a `Database` instance and opens a fresh connection per
/// operation. When cloned, it shares the same underlying database, so an
/// in-memory database can be shared by cloning one provider.
#[derive(Clone)]
pub struct SqliteProvider {
    /// The Turso database instance. It's cloneable and thread-safe.
    pub db: Database,
}

impl SqliteProvider {
    /// Creates a new `SqliteProvider` from a file path or in-memory.
    ///
    /// # Arguments
    ///
    /// * `db_path`: The path to the SQLite database file. Use ":memory:" for a unique,
    ///   isolated in-memory database.
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        // PRAGMA returns a row, so it goes through `query`.
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { db })
    }

    /// Ensures that all application tables and indexes exist.
    /// Idempotent, so it runs on every startup.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ())
                .await
                .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
        }
        info!("SQLite schema is up to date.");
        Ok(())
    }

    /// A helper for tests to pre-populate data by executing multiple SQL statements.
    pub async fn initialize_with_data(&self, init_sql: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;
        for statement in init_sql.split(';').filter(|s| !s.trim().is_empty()) {
            conn.execute(statement, ())
                .await
                .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
        }
        Ok(())
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        self.db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    /// Commits the transaction open on `conn` if `result` is `Ok`, otherwise
    /// rolls it back and returns the original error.
    async fn finish_transaction<T>(
        conn: &Connection,
        result: Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        match result {
            Ok(value) => {
                conn.execute("COMMIT", ()).await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = conn.execute("ROLLBACK", ()).await {
                    warn!("Rollback failed after '{e}': {rollback}");
                }
                Err(e)
            }
        }
    }

    /// Returns the rowid assigned by the last INSERT on `conn`.
    async fn last_insert_id(conn: &Connection) -> Result<i64, StoreError> {
        let mut rows = conn.query(sql::LAST_INSERT_ROWID_SQL, ()).await?;
        let row = rows.next().await?.ok_or_else(|| {
            StoreError::OperationFailed("last_insert_rowid() returned no row".to_string())
        })?;
        int(&row, 0)
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}

// --- Column encoding ---

/// Encodes a timestamp in the single fixed-width form every timestamp column
/// uses, so text order equals time order.
pub(crate) fn to_db_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn to_db_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_db_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::DataIntegrity(format!("Failed to parse timestamp '{value}': {e}")))
}

fn opt_text_value(value: Option<&str>) -> TursoValue {
    match value {
        Some(s) => TursoValue::Text(s.to_string()),
        None => TursoValue::Null,
    }
}

fn opt_int_value(value: Option<i64>) -> TursoValue {
    match value {
        Some(i) => TursoValue::Integer(i),
        None => TursoValue::Null,
    }
}

fn json_list_value<T: serde::Serialize>(values: &[T]) -> Result<TursoValue, StoreError> {
    Ok(TursoValue::Text(serde_json::to_string(values)?))
}

// --- Row decoding ---

fn opt_text(row: &Row, idx: usize) -> Result<Option<String>, StoreError> {
    match row.get_value(idx)? {
        TursoValue::Text(s) => Ok(Some(s)),
        TursoValue::Null => Ok(None),
        other => Err(StoreError::DataIntegrity(format!(
            "Expected text in column {idx}, got {other:?}"
        ))),
    }
}

fn text(row: &Row, idx: usize) -> Result<String, StoreError> {
    opt_text(row, idx)?
        .ok_or_else(|| StoreError::DataIntegrity(format!("Unexpected NULL in column {idx}")))
}

fn opt_int(row: &Row, idx: usize) -> Result<Option<i64>, StoreError> {
    match row.get_value(idx)? {
        TursoValue::Integer(i) => Ok(Some(i)),
        TursoValue::Null => Ok(None),
        other => Err(StoreError::DataIntegrity(format!(
            "Expected integer in column {idx}, got {other:?}"
        ))),
    }
}

fn int(row: &Row, idx: usize) -> Result<i64, StoreError> {
    opt_int(row, idx)?
        .ok_or_else(|| StoreError::DataIntegrity(format!("Unexpected NULL in column {idx}")))
}

fn timestamp(row: &Row, idx: usize) -> Result<DateTime<Utc>, StoreError> {
    parse_db_timestamp(&text(row, idx)?)
}

fn opt_date(row: &Row, idx: usize) -> Result<Option<NaiveDate>, StoreError> {
    opt_text(row, idx)?
        .map(|d| {
            NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|e| {
                StoreError::DataIntegrity(format!("Failed to parse date '{d}': {e}"))
            })
        })
        .transpose()
}

/// Parses a stored enum value. A value the type rejects means the row is
/// corrupt, not that the caller sent bad input.
fn parse_column<T: FromStr<Err = StoreError>>(value: &str, idx: usize) -> Result<T, StoreError> {
    value.parse().map_err(|e| {
        StoreError::DataIntegrity(format!("Invalid value in column {idx}: {e}"))
    })
}

fn json_list<T: serde::de::DeserializeOwned>(row: &Row, idx: usize) -> Result<Vec<T>, StoreError> {
    match opt_text(row, idx)? {
        Some(s) if !s.trim().is_empty() => Ok(serde_json::from_str(&s)?),
        _ => Ok(Vec::new()),
    }
}

/// Decodes a row selected with `sql::CONTENT_COLUMNS`.
fn content_from_row(row: &Row) -> Result<ContentItem, StoreError> {
    let content_type: ContentType = parse_column(&text(row, 2)?, 2)?;
    let difficulty = opt_text(row, 8)?
        .map(|d| parse_column::<Difficulty>(&d, 8))
        .transpose()?;
    Ok(ContentItem {
        id: int(row, 0)?,
        title: text(row, 1)?,
        content_type,
        body: opt_text(row, 3)?,
        url: opt_text(row, 4)?,
        tags: json_list(row, 5)?,
        source: opt_text(row, 6)?,
        estimated_time_minutes: opt_int(row, 7)?,
        difficulty,
        created_at: timestamp(row, 9)?,
        updated_at: timestamp(row, 10)?,
    })
}

/// Decodes a row selected with `sql::PROFILE_COLUMNS`.
fn profile_from_row(row: &Row) -> Result<UserProfile, StoreError> {
    Ok(UserProfile {
        user_id: int(row, 0)?,
        areas_of_concern: json_list(row, 1)?,
        preferred_content_types: json_list(row, 2)?,
        created_at: timestamp(row, 3)?,
        updated_at: timestamp(row, 4)?,
    })
}

/// Decodes a row selected with `sql::MOOD_LOG_COLUMNS`.
fn mood_log_from_row(row: &Row) -> Result<MoodLogEntry, StoreError> {
    Ok(MoodLogEntry {
        id: int(row, 0)?,
        user_id: int(row, 1)?,
        mood_rating: int(row, 2)?,
        symptoms: json_list(row, 3)?,
        triggers: json_list(row, 4)?,
        notes: opt_text(row, 5)?,
        logged_at: timestamp(row, 6)?,
        created_at: timestamp(row, 7)?,
    })
}

/// Decodes a row selected with `sql::INTERACTION_COLUMNS`.
fn interaction_from_row(row: &Row) -> Result<InteractionRecord, StoreError> {
    Ok(InteractionRecord {
        user_id: int(row, 0)?,
        content_item_id: int(row, 1)?,
        viewed_at: timestamp(row, 2)?,
        rating: opt_int(row, 3)?,
        is_helpful: opt_int(row, 4)?.map(|v| v != 0),
        feedback_text: opt_text(row, 5)?,
    })
}

/// Decodes a row selected with `sql::TASK_COLUMNS`.
fn task_from_row(row: &Row) -> Result<Task, StoreError> {
    Ok(Task {
        id: int(row, 0)?,
        title: text(row, 1)?,
        description: opt_text(row, 2)?,
        points: int(row, 3)?,
        mood_tags: json_list(row, 4)?,
        created_at: timestamp(row, 5)?,
        updated_at: timestamp(row, 6)?,
    })
}

/// Decodes a row selected with `sql::TASK_STATS_COLUMNS`.
fn task_progress_from_row(row: &Row) -> Result<TaskProgress, StoreError> {
    Ok(TaskProgress {
        points: int(row, 0)?,
        current_streak: int(row, 1)?,
        longest_streak: int(row, 2)?,
        last_task_date: opt_date(row, 3)?,
    })
}

fn task_completion_from_row(row: &Row) -> Result<TaskCompletion, StoreError> {
    Ok(TaskCompletion {
        task_id: int(row, 0)?,
        completed_at: timestamp(row, 1)?,
    })
}

// --- Read seams used by the recommendation engine ---

#[async_trait]
impl ProfileStore for SqliteProvider {
    async fn get_profile(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError> {
        let conn = self.connect()?;
        Self::select_profile(&conn, user_id).await
    }
}

#[async_trait]
impl MoodLogStore for SqliteProvider {
    async fn get_latest_mood_log(
        &self,
        user_id: i64,
    ) -> Result<Option<MoodLogEntry>, StoreError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {} FROM mood_logs WHERE user_id = ?
             ORDER BY logged_at DESC, created_at DESC, id DESC LIMIT 1",
            sql::MOOD_LOG_COLUMNS
        );
        let mut rows = conn.query(&sql, vec![TursoValue::Integer(user_id)]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(mood_log_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl InteractionStore for SqliteProvider {
    async fn get_recent_interactions(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>, StoreError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(
                &sql::recent_interactions(limit),
                vec![TursoValue::Integer(user_id)],
            )
            .await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(interaction_from_row(&row)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl ContentStore for SqliteProvider {
    /// Scans content newest first and keeps items whose tags overlap the query
    /// tags, stopping as soon as the pool is full.
    async fn query_content_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<ContentItem>, StoreError> {
        let conn = self.connect()?;
        let sql = sql::content_scan(query.exclude_ids.len());
        let params: Vec<TursoValue> = query
            .exclude_ids
            .iter()
            .map(|id| TursoValue::Integer(*id))
            .collect();

        debug!(sql = %sql, excluded = ?query.exclude_ids, "Scanning content candidates");

        let mut rows = if params.is_empty() {
            conn.query(&sql, ()).await?
        } else {
            conn.query(&sql, params).await?
        };

        let mut candidates = Vec::new();
        while candidates.len() < query.limit {
            let Some(row) = rows.next().await? else {
                break;
            };
            let item = content_from_row(&row)?;
            let qualifies = match &query.tags_overlap_any {
                Some(tags) => overlaps(&item.tags, tags),
                None => true,
            };
            if qualifies {
                candidates.push(item);
            }
        }
        Ok(candidates)
    }
}
