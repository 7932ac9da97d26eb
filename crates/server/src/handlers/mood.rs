//! # Mood Log Handlers

use super::{AppError, AppState};
use crate::auth::middleware::AuthenticatedUser;
use axum::{extract::State, http::StatusCode, Json};
use mindscribe::types::{MoodLogEntry, NewMoodLog};
use tracing::info;

/// Records a mood log for the caller.
pub async fn create_mood_log_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<NewMoodLog>,
) -> Result<(StatusCode, Json<MoodLogEntry>), AppError> {
    info!(user_id = user.0, "Received mood log.");
    let entry = app_state
        .sqlite_provider
        .create_mood_log(user.0, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Lists the caller's mood logs, newest first.
pub async fn list_mood_logs_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<MoodLogEntry>>, AppError> {
    let logs = app_state.sqlite_provider.list_mood_logs(user.0).await?;
    Ok(Json(logs))
}
