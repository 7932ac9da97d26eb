//! Per-user records for the SQLite provider: profiles, mood logs and
//! content interactions.

use super::{
    interaction_from_row, json_list_value, mood_log_from_row, opt_int_value, opt_text_value,
    profile_from_row, sql, to_db_timestamp, SqliteProvider,
};
use crate::{
    errors::StoreError,
    types::{
        InteractionRecord, InteractionUpdate, MoodLogEntry, NewMoodLog, ProfileUpdate,
        UserProfile,
    },
};
use chrono::Utc;
use tracing::info;
use turso::{Connection, Value as TursoValue};

impl SqliteProvider {
    pub(super) async fn select_profile(
        conn: &Connection,
        user_id: i64,
    ) -> Result<Option<UserProfile>, StoreError> {
        let sql = format!(
            "SELECT {} FROM user_profiles WHERE user_id = ?",
            sql::PROFILE_COLUMNS
        );
        let mut rows = conn.query(&sql, vec![TursoValue::Integer(user_id)]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(profile_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Returns the user's profile, creating an empty one on first access.
    /// Concurrent first reads all see the same row.
    pub async fn get_or_create_profile(&self, user_id: i64) -> Result<UserProfile, StoreError> {
        let conn = self.connect()?;
        if let Some(profile) = Self::select_profile(&conn, user_id).await? {
            return Ok(profile);
        }

        let profile = UserProfile::empty(user_id, Utc::now());
        let inserted = conn
            .execute(
                sql::INSERT_PROFILE_IF_ABSENT_SQL,
                vec![
                    TursoValue::Integer(profile.user_id),
                    json_list_value(&profile.areas_of_concern)?,
                    json_list_value(&profile.preferred_content_types)?,
                    TursoValue::Text(to_db_timestamp(&profile.created_at)),
                    TursoValue::Text(to_db_timestamp(&profile.updated_at)),
                ],
            )
            .await?;
        if inserted > 0 {
            info!(user_id, "Created empty profile.");
        }

        Self::select_profile(&conn, user_id)
            .await?
            .ok_or_else(|| {
                StoreError::OperationFailed(format!("Profile for user {user_id} missing after insert"))
            })
    }

    /// Updates the user's profile, creating it first if needed.
    pub async fn update_profile(
        &self,
        user_id: i64,
        update: ProfileUpdate,
    ) -> Result<UserProfile, StoreError> {
        let mut profile = self.get_or_create_profile(user_id).await?;
        update.apply_to(&mut profile)?;
        profile.updated_at = Utc::now();

        let conn = self.connect()?;
        conn.execute(
            "UPDATE user_profiles SET areas_of_concern = ?, preferred_content_types = ?, updated_at = ?
             WHERE user_id = ?",
            vec![
                json_list_value(&profile.areas_of_concern)?,
                json_list_value(&profile.preferred_content_types)?,
                TursoValue::Text(to_db_timestamp(&profile.updated_at)),
                TursoValue::Integer(user_id),
            ],
        )
        .await?;

        Self::select_profile(&conn, user_id)
            .await?
            .ok_or_else(|| StoreError::NotFound("Profile".to_string()))
    }

    /// Validates and stores a mood log. `logged_at` defaults to now.
    pub async fn create_mood_log(
        &self,
        user_id: i64,
        mut new_log: NewMoodLog,
    ) -> Result<MoodLogEntry, StoreError> {
        let rating = new_log.validate()?;
        let now = Utc::now();
        let logged_at = new_log.logged_at.unwrap_or(now);
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO mood_logs (user_id, mood_rating, symptoms, triggers, notes, logged_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            vec![
                TursoValue::Integer(user_id),
                TursoValue::Integer(rating),
                json_list_value(&new_log.symptoms)?,
                json_list_value(&new_log.triggers)?,
                opt_text_value(new_log.notes.as_deref()),
                TursoValue::Text(to_db_timestamp(&logged_at)),
                TursoValue::Text(to_db_timestamp(&now)),
            ],
        )
        .await?;

        let id = Self::last_insert_id(&conn).await?;
        info!(user_id, mood_log_id = id, "Created mood log.");

        let sql = format!("SELECT {} FROM mood_logs WHERE id = ?", sql::MOOD_LOG_COLUMNS);
        let mut rows = conn.query(&sql, vec![TursoValue::Integer(id)]).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Mood log {id}")))?;
        mood_log_from_row(&row)
    }

    /// Lists the user's mood logs, newest first.
    pub async fn list_mood_logs(&self, user_id: i64) -> Result<Vec<MoodLogEntry>, StoreError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {} FROM mood_logs WHERE user_id = ?
             ORDER BY logged_at DESC, created_at DESC, id DESC",
            sql::MOOD_LOG_COLUMNS
        );
        let mut rows = conn.query(&sql, vec![TursoValue::Integer(user_id)]).await?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next().await? {
            logs.push(mood_log_from_row(&row)?);
        }
        Ok(logs)
    }

    async fn select_interaction(
        conn: &Connection,
        user_id: i64,
        content_item_id: i64,
    ) -> Result<Option<InteractionRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM user_content_interactions WHERE user_id = ? AND content_item_id = ?",
            sql::INTERACTION_COLUMNS
        );
        let mut rows = conn
            .query(
                &sql,
                vec![
                    TursoValue::Integer(user_id),
                    TursoValue::Integer(content_item_id),
                ],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(interaction_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Returns the user's interaction with a content item, if any.
    pub async fn get_interaction(
        &self,
        user_id: i64,
        content_item_id: i64,
    ) -> Result<Option<InteractionRecord>, StoreError> {
        let conn = self.connect()?;
        Self::select_interaction(&conn, user_id, content_item_id).await
    }

    /// Records an interaction, inserting or updating the single record kept per
    /// (user, item) pair in one statement. `viewed_at` is always refreshed;
    /// rating, helpfulness and feedback change only when provided.
    pub async fn record_interaction(
        &self,
        user_id: i64,
        content_item_id: i64,
        update: InteractionUpdate,
    ) -> Result<InteractionRecord, StoreError> {
        update.validate()?;
        if self.get_content(content_item_id).await?.is_none() {
            return Err(StoreError::NotFound("Content item".to_string()));
        }

        let conn = self.connect()?;
        conn.execute(
            sql::UPSERT_INTERACTION_SQL,
            vec![
                TursoValue::Integer(user_id),
                TursoValue::Integer(content_item_id),
                TursoValue::Text(to_db_timestamp(&Utc::now())),
                opt_int_value(update.rating),
                opt_int_value(update.is_helpful.map(i64::from)),
                opt_text_value(update.feedback_text.as_deref()),
            ],
        )
        .await?;

        Self::select_interaction(&conn, user_id, content_item_id)
            .await?
            .ok_or_else(|| StoreError::NotFound("Interaction".to_string()))
    }
}
