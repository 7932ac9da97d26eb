//! # Task Handlers
//!
//! Gamified wellness tasks: browsing, completing for points, and the caller's
//! running score and streaks.

use super::{AppError, AppState};
use crate::auth::middleware::AuthenticatedUser;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mindscribe::types::{NewTask, Task, TaskFilter, TaskListing, TaskStats};
use serde_json::{json, Value};
use tracing::info;

/// Lists tasks, highest reward first. Accepts `?mood=stress&search=walk`.
pub async fn list_tasks_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<TaskListing>>, AppError> {
    let tasks = app_state.sqlite_provider.list_tasks(user.0, &filter).await?;
    Ok(Json(tasks))
}

/// Adds a task to the catalogue.
pub async fn create_task_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    info!(user_id = user.0, title = %payload.title, "Creating task.");
    let task = app_state.sqlite_provider.create_task(payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Marks a task completed by the caller and returns the updated score.
pub async fn complete_task_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest("Invalid task ID".to_string()));
    }
    let progress = app_state.sqlite_provider.complete_task(user.0, id).await?;
    Ok(Json(json!({
        "msg": "Task completed",
        "updated": {
            "points": progress.points,
            "currentStreak": progress.current_streak,
            "longestStreak": progress.longest_streak,
        }
    })))
}

/// Returns the caller's points, streaks and latest completions.
pub async fn task_stats_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<TaskStats>, AppError> {
    let stats = app_state.sqlite_provider.get_task_stats(user.0).await?;
    Ok(Json(stats))
}
