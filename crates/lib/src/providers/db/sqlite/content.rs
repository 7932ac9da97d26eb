//! Content catalogue reads and writes for the SQLite provider.

use super::{
    content_from_row, json_list_value, opt_int_value, opt_text_value, sql, to_db_timestamp,
    SqliteProvider,
};
use crate::{
    errors::StoreError,
    tags::{normalize_tags, overlaps},
    types::{ContentFilter, ContentItem, ContentUpdate, NewContentItem},
};
use chrono::Utc;
use std::collections::BTreeSet;
use tracing::info;
use turso::{Connection, Value as TursoValue};

impl SqliteProvider {
    async fn select_content(
        conn: &Connection,
        id: i64,
    ) -> Result<Option<ContentItem>, StoreError> {
        let sql = format!(
            "SELECT {} FROM content_items WHERE id = ?",
            sql::CONTENT_COLUMNS
        );
        let mut rows = conn.query(&sql, vec![TursoValue::Integer(id)]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(content_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetches a single content item.
    pub async fn get_content(&self, id: i64) -> Result<Option<ContentItem>, StoreError> {
        let conn = self.connect()?;
        Self::select_content(&conn, id).await
    }

    /// Lists content matching the filter, most recently updated first.
    ///
    /// Type and text search run in SQL; the tag overlap is checked on the
    /// decoded rows so it uses the same normalization as everything else.
    pub async fn list_content(&self, filter: &ContentFilter) -> Result<Vec<ContentItem>, StoreError> {
        let conn = self.connect()?;

        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<TursoValue> = Vec::new();
        if let Some(kind) = filter.content_type {
            conditions.push("content_type = ?".to_string());
            params.push(TursoValue::Text(kind.as_str().to_string()));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            conditions.push("(lower(title) LIKE ? OR lower(COALESCE(body, '')) LIKE ?)".to_string());
            params.push(TursoValue::Text(pattern.clone()));
            params.push(TursoValue::Text(pattern));
        }

        let mut sql = format!("SELECT {} FROM content_items", sql::CONTENT_COLUMNS);
        if !conditions.is_empty() {
            sql.push_str(&format!(" WHERE {}", conditions.join(" AND ")));
        }
        sql.push_str(" ORDER BY updated_at DESC, id DESC");

        let mut rows = if params.is_empty() {
            conn.query(&sql, ()).await?
        } else {
            conn.query(&sql, params).await?
        };

        let wanted: BTreeSet<String> = normalize_tags(&filter.tags).into_iter().collect();
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            let item = content_from_row(&row)?;
            if wanted.is_empty() || overlaps(&item.tags, &wanted) {
                items.push(item);
            }
        }
        Ok(items)
    }

    /// Validates and stores a new content item.
    pub async fn create_content(&self, new_item: NewContentItem) -> Result<ContentItem, StoreError> {
        let item = new_item.validate()?;
        let now = to_db_timestamp(&Utc::now());
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO content_items (title, content_type, body, url, tags, source, estimated_time_minutes, difficulty, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            vec![
                TursoValue::Text(item.title.clone()),
                TursoValue::Text(item.content_type.as_str().to_string()),
                opt_text_value(item.body.as_deref()),
                opt_text_value(item.url.as_deref()),
                json_list_value(&item.tags)?,
                opt_text_value(item.source.as_deref()),
                opt_int_value(item.estimated_time_minutes),
                opt_text_value(item.difficulty.map(|d| d.as_str())),
                TursoValue::Text(now.clone()),
                TursoValue::Text(now),
            ],
        )
        .await?;

        let id = Self::last_insert_id(&conn).await?;
        info!(content_id = id, title = %item.title, "Created content item.");
        Self::select_content(&conn, id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Content item {id}")))
    }

    /// Applies a partial update and bumps `updated_at`.
    pub async fn update_content(&self, id: i64, update: ContentUpdate) -> Result<ContentItem, StoreError> {
        let conn = self.connect()?;
        let mut item = Self::select_content(&conn, id)
            .await?
            .ok_or_else(|| StoreError::NotFound("Content item".to_string()))?;

        update.apply_to(&mut item)?;
        item.updated_at = Utc::now();

        conn.execute(
            "UPDATE content_items
             SET title = ?, content_type = ?, body = ?, url = ?, tags = ?, source = ?,
                 estimated_time_minutes = ?, difficulty = ?, updated_at = ?
             WHERE id = ?",
            vec![
                TursoValue::Text(item.title.clone()),
                TursoValue::Text(item.content_type.as_str().to_string()),
                opt_text_value(item.body.as_deref()),
                opt_text_value(item.url.as_deref()),
                json_list_value(&item.tags)?,
                opt_text_value(item.source.as_deref()),
                opt_int_value(item.estimated_time_minutes),
                opt_text_value(item.difficulty.map(|d| d.as_str())),
                TursoValue::Text(to_db_timestamp(&item.updated_at)),
                TursoValue::Integer(id),
            ],
        )
        .await?;

        Self::select_content(&conn, id)
            .await?
            .ok_or_else(|| StoreError::NotFound("Content item".to_string()))
    }

    /// Deletes a content item together with every interaction recorded on it,
    /// in one transaction. Returns `false` if the item did not exist.
    pub async fn delete_content(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        conn.execute("BEGIN TRANSACTION", ()).await?;
        let result = Self::delete_content_rows(&conn, id).await;
        let deleted = Self::finish_transaction(&conn, result).await?;
        if deleted {
            info!(content_id = id, "Deleted content item.");
        }
        Ok(deleted)
    }

    async fn delete_content_rows(conn: &Connection, id: i64) -> Result<bool, StoreError> {
        conn.execute(
            "DELETE FROM user_content_interactions WHERE content_item_id = ?",
            vec![TursoValue::Integer(id)],
        )
        .await?;
        let deleted = conn
            .execute(
                "DELETE FROM content_items WHERE id = ?",
                vec![TursoValue::Integer(id)],
            )
            .await?;
        Ok(deleted > 0)
    }
}
