//! Wellness tasks for the SQLite provider: the task catalogue, per-user
//! completions and the points and streaks they earn.

use super::{
    int, json_list_value, opt_text_value, sql, task_completion_from_row, task_from_row,
    task_progress_from_row, timestamp, to_db_date, to_db_timestamp, SqliteProvider,
};
use crate::{
    constants::{DEFAULT_TASK_POINTS, RECENT_COMPLETIONS_LIMIT},
    errors::StoreError,
    tags::normalize_tag,
    types::{NewTask, Task, TaskFilter, TaskListing, TaskProgress, TaskStats},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::info;
use turso::{Connection, Value as TursoValue};

impl SqliteProvider {
    async fn select_task(conn: &Connection, id: i64) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?", sql::TASK_COLUMNS);
        let mut rows = conn.query(&sql, vec![TursoValue::Integer(id)]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(task_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn select_task_progress(
        conn: &Connection,
        user_id: i64,
    ) -> Result<TaskProgress, StoreError> {
        let sql = format!(
            "SELECT {} FROM user_task_stats WHERE user_id = ?",
            sql::TASK_STATS_COLUMNS
        );
        let mut rows = conn.query(&sql, vec![TursoValue::Integer(user_id)]).await?;
        match rows.next().await? {
            Some(row) => task_progress_from_row(&row),
            None => Ok(TaskProgress::default()),
        }
    }

    /// Fetches a single task.
    pub async fn get_task(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let conn = self.connect()?;
        Self::select_task(&conn, id).await
    }

    /// Validates and stores a new task.
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, StoreError> {
        let task = new_task.validate()?;
        let now = to_db_timestamp(&Utc::now());
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO tasks (title, description, points, mood_tags, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            vec![
                TursoValue::Text(task.title.clone()),
                opt_text_value(task.description.as_deref()),
                TursoValue::Integer(task.points.unwrap_or(DEFAULT_TASK_POINTS)),
                json_list_value(&task.mood_tags)?,
                TursoValue::Text(now.clone()),
                TursoValue::Text(now),
            ],
        )
        .await?;

        let id = Self::last_insert_id(&conn).await?;
        info!(task_id = id, title = %task.title, "Created task.");
        Self::select_task(&conn, id)
            .await?
            .ok_or_else(|| StoreError::NotFound("Task".to_string()))
    }

    /// Lists tasks, highest points first, each marked with `user_id`'s
    /// completion time.
    pub async fn list_tasks(
        &self,
        user_id: i64,
        filter: &TaskFilter,
    ) -> Result<Vec<TaskListing>, StoreError> {
        let conn = self.connect()?;
        let mood = filter.mood.as_deref().and_then(normalize_tag);
        let search = filter
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut completions: HashMap<i64, DateTime<Utc>> = HashMap::new();
        let mut rows = conn
            .query(
                "SELECT task_id, completed_at FROM user_tasks WHERE user_id = ?",
                vec![TursoValue::Integer(user_id)],
            )
            .await?;
        while let Some(row) = rows.next().await? {
            completions.insert(int(&row, 0)?, timestamp(&row, 1)?);
        }

        let sql = format!(
            "SELECT {} FROM tasks ORDER BY points DESC, id ASC",
            sql::TASK_COLUMNS
        );
        let mut rows = conn.query(&sql, ()).await?;
        let mut listings = Vec::new();
        while let Some(row) = rows.next().await? {
            let task = task_from_row(&row)?;
            if let Some(mood) = &mood {
                if !task.mood_tags.contains(mood) {
                    continue;
                }
            }
            if let Some(search) = &search {
                if !task.title.to_lowercase().contains(search.as_str()) {
                    continue;
                }
            }
            listings.push(TaskListing {
                completed_at: completions.get(&task.id).copied(),
                task,
            });
        }
        Ok(listings)
    }

    /// Completes a task for `user_id` now. See [`Self::complete_task_at`].
    pub async fn complete_task(
        &self,
        user_id: i64,
        task_id: i64,
    ) -> Result<TaskProgress, StoreError> {
        self.complete_task_at(user_id, task_id, Utc::now()).await
    }

    /// Records that `user_id` completed `task_id` at `now`, awards the task's
    /// points and advances the user's streak, all in one transaction.
    ///
    /// Each task can be completed once per user; a repeat is a validation error.
    pub async fn complete_task_at(
        &self,
        user_id: i64,
        task_id: i64,
        now: DateTime<Utc>,
    ) -> Result<TaskProgress, StoreError> {
        let task = self
            .get_task(task_id)
            .await?
            .ok_or_else(|| StoreError::NotFound("Task".to_string()))?;

        let conn = self.connect()?;
        conn.execute("BEGIN TRANSACTION", ()).await?;
        let result = Self::record_completion(&conn, user_id, &task, now).await;
        let progress = Self::finish_transaction(&conn, result).await?;

        info!(
            user_id,
            task_id,
            points = progress.points,
            current_streak = progress.current_streak,
            "Task completed."
        );
        Ok(progress)
    }

    async fn record_completion(
        conn: &Connection,
        user_id: i64,
        task: &Task,
        now: DateTime<Utc>,
    ) -> Result<TaskProgress, StoreError> {
        let inserted = conn
            .execute(
                sql::INSERT_TASK_COMPLETION_SQL,
                vec![
                    TursoValue::Integer(user_id),
                    TursoValue::Integer(task.id),
                    TursoValue::Text(to_db_timestamp(&now)),
                ],
            )
            .await?;
        if inserted == 0 {
            return Err(StoreError::Validation("Task already completed".to_string()));
        }

        let mut progress = Self::select_task_progress(conn, user_id).await?;
        progress.record_completion(task.points, now.date_naive());

        conn.execute(
            sql::UPSERT_TASK_STATS_SQL,
            vec![
                TursoValue::Integer(user_id),
                TursoValue::Integer(progress.points),
                TursoValue::Integer(progress.current_streak),
                TursoValue::Integer(progress.longest_streak),
                match &progress.last_task_date {
                    Some(date) => TursoValue::Text(to_db_date(date)),
                    None => TursoValue::Null,
                },
            ],
        )
        .await?;
        Ok(progress)
    }

    /// Returns the user's points and streaks with their latest completions.
    pub async fn get_task_stats(&self, user_id: i64) -> Result<TaskStats, StoreError> {
        let conn = self.connect()?;
        let progress = Self::select_task_progress(&conn, user_id).await?;

        let mut rows = conn
            .query(
                &sql::recent_completions(RECENT_COMPLETIONS_LIMIT),
                vec![TursoValue::Integer(user_id)],
            )
            .await?;
        let mut recent_completions = Vec::new();
        while let Some(row) = rows.next().await? {
            recent_completions.push(task_completion_from_row(&row)?);
        }

        Ok(TaskStats {
            progress,
            recent_completions,
        })
    }
}
