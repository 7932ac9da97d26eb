//! # SQLite Specific SQL Queries
//!
//! This module centralizes SQL query strings for the SQLite provider.
//! Tag lists are stored as JSON arrays in TEXT columns.
//!
//! Every timestamp column holds the fixed-width form written by
//! `to_db_timestamp` (`2025-05-01T08:00:00.000000Z`: UTC, microseconds, `Z`
//! suffix). The `ORDER BY` clauses below compare these columns as text, which
//! matches chronological order only for that form. Rows inserted by hand must
//! use it too. Calendar dates (`last_task_date`) are stored as `YYYY-MM-DD`.

pub const CREATE_CONTENT_ITEMS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS content_items (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        content_type TEXT NOT NULL,
        body TEXT,
        url TEXT,
        tags TEXT NOT NULL DEFAULT '[]',
        source TEXT,
        estimated_time_minutes INTEGER,
        difficulty TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

pub const CREATE_USER_PROFILES_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS user_profiles (
        user_id INTEGER PRIMARY KEY,
        areas_of_concern TEXT NOT NULL DEFAULT '[]',
        preferred_content_types TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

pub const CREATE_MOOD_LOGS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS mood_logs (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL,
        mood_rating INTEGER NOT NULL,
        symptoms TEXT NOT NULL DEFAULT '[]',
        triggers TEXT NOT NULL DEFAULT '[]',
        notes TEXT,
        logged_at TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
";

pub const CREATE_INTERACTIONS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS user_content_interactions (
        user_id INTEGER NOT NULL,
        content_item_id INTEGER NOT NULL,
        viewed_at TEXT NOT NULL,
        rating INTEGER,
        is_helpful INTEGER,
        feedback_text TEXT,
        PRIMARY KEY (user_id, content_item_id)
    );
";

pub const CREATE_TASKS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        points INTEGER NOT NULL DEFAULT 10,
        mood_tags TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

pub const CREATE_USER_TASKS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS user_tasks (
        user_id INTEGER NOT NULL,
        task_id INTEGER NOT NULL,
        completed_at TEXT NOT NULL,
        PRIMARY KEY (user_id, task_id)
    );
";

pub const CREATE_USER_TASK_STATS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS user_task_stats (
        user_id INTEGER PRIMARY KEY,
        points INTEGER NOT NULL DEFAULT 0,
        current_streak INTEGER NOT NULL DEFAULT 0,
        longest_streak INTEGER NOT NULL DEFAULT 0,
        last_task_date TEXT
    );
";

pub const CREATE_CONTENT_UPDATED_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_content_items_updated_at ON content_items(updated_at);";

pub const CREATE_MOOD_LOGS_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_mood_logs_user_logged ON mood_logs(user_id, logged_at);";

pub const CREATE_INTERACTIONS_INDEX_SQL: &str = "CREATE INDEX IF NOT EXISTS idx_interactions_user_viewed ON user_content_interactions(user_id, viewed_at);";

pub const CREATE_USER_TASKS_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_user_tasks_user_completed ON user_tasks(user_id, completed_at);";

/// Every statement needed to bring an empty database up to the current schema.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    CREATE_CONTENT_ITEMS_TABLE_SQL,
    CREATE_USER_PROFILES_TABLE_SQL,
    CREATE_MOOD_LOGS_TABLE_SQL,
    CREATE_INTERACTIONS_TABLE_SQL,
    CREATE_TASKS_TABLE_SQL,
    CREATE_USER_TASKS_TABLE_SQL,
    CREATE_USER_TASK_STATS_TABLE_SQL,
    CREATE_CONTENT_UPDATED_INDEX_SQL,
    CREATE_MOOD_LOGS_INDEX_SQL,
    CREATE_INTERACTIONS_INDEX_SQL,
    CREATE_USER_TASKS_INDEX_SQL,
];

/// The column list shared by every content query, in the order `content_from_row` reads it.
pub const CONTENT_COLUMNS: &str = "id, title, content_type, body, url, tags, source, estimated_time_minutes, difficulty, created_at, updated_at";

pub const PROFILE_COLUMNS: &str =
    "user_id, areas_of_concern, preferred_content_types, created_at, updated_at";

pub const MOOD_LOG_COLUMNS: &str =
    "id, user_id, mood_rating, symptoms, triggers, notes, logged_at, created_at";

pub const INTERACTION_COLUMNS: &str =
    "user_id, content_item_id, viewed_at, rating, is_helpful, feedback_text";

pub const TASK_COLUMNS: &str =
    "id, title, description, points, mood_tags, created_at, updated_at";

pub const TASK_STATS_COLUMNS: &str =
    "points, current_streak, longest_streak, last_task_date";

/// Creates the profile row unless one already exists.
pub const INSERT_PROFILE_IF_ABSENT_SQL: &str = "
    INSERT INTO user_profiles (user_id, areas_of_concern, preferred_content_types, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?)
    ON CONFLICT(user_id) DO NOTHING";

/// Inserts or folds an interaction into the (user, item) record. NULL
/// parameters leave the stored value alone; `viewed_at` always moves.
pub const UPSERT_INTERACTION_SQL: &str = "
    INSERT INTO user_content_interactions (user_id, content_item_id, viewed_at, rating, is_helpful, feedback_text)
    VALUES (?, ?, ?, ?, ?, ?)
    ON CONFLICT(user_id, content_item_id) DO UPDATE SET
        viewed_at = excluded.viewed_at,
        rating = COALESCE(excluded.rating, user_content_interactions.rating),
        is_helpful = COALESCE(excluded.is_helpful, user_content_interactions.is_helpful),
        feedback_text = COALESCE(excluded.feedback_text, user_content_interactions.feedback_text)";

/// Records a completion. Affects no row when the task was already completed.
pub const INSERT_TASK_COMPLETION_SQL: &str = "
    INSERT INTO user_tasks (user_id, task_id, completed_at) VALUES (?, ?, ?)
    ON CONFLICT(user_id, task_id) DO NOTHING";

pub const UPSERT_TASK_STATS_SQL: &str = "
    INSERT INTO user_task_stats (user_id, points, current_streak, longest_streak, last_task_date)
    VALUES (?, ?, ?, ?, ?)
    ON CONFLICT(user_id) DO UPDATE SET
        points = excluded.points,
        current_streak = excluded.current_streak,
        longest_streak = excluded.longest_streak,
        last_task_date = excluded.last_task_date";

pub const LAST_INSERT_ROWID_SQL: &str = "SELECT last_insert_rowid()";

/// Returns the SQL for scanning content items newest first, skipping `excluded` ids.
///
/// The query expects one positional parameter per excluded id.
pub fn content_scan(excluded: usize) -> String {
    let mut sql = format!("SELECT {CONTENT_COLUMNS} FROM content_items");
    if excluded > 0 {
        let placeholders = vec!["?"; excluded].join(", ");
        sql.push_str(&format!(" WHERE id NOT IN ({placeholders})"));
    }
    sql.push_str(" ORDER BY updated_at DESC, id DESC");
    sql
}

/// Returns the SQL for fetching a user's most recent interactions.
pub fn recent_interactions(limit: usize) -> String {
    format!(
        "SELECT {INTERACTION_COLUMNS} FROM user_content_interactions
         WHERE user_id = ?
         ORDER BY viewed_at DESC, content_item_id DESC
         LIMIT {limit}"
    )
}

/// Returns the SQL for a user's most recent task completions.
pub fn recent_completions(limit: usize) -> String {
    format!(
        "SELECT task_id, completed_at FROM user_tasks
         WHERE user_id = ?
         ORDER BY completed_at DESC, task_id DESC
         LIMIT {limit}"
    )
}
