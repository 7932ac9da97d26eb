//! # Profile Handlers

use super::{AppError, AppState};
use crate::auth::middleware::AuthenticatedUser;
use axum::{extract::State, Json};
use mindscribe::types::{ProfileUpdate, UserProfile};
use tracing::info;

/// Returns the caller's profile, creating an empty one on first access.
pub async fn get_profile_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserProfile>, AppError> {
    let profile = app_state.sqlite_provider.get_or_create_profile(user.0).await?;
    Ok(Json(profile))
}

/// Updates the caller's concerns and preferred content types.
pub async fn update_profile_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    info!(user_id = user.0, "Updating profile.");
    let profile = app_state
        .sqlite_provider
        .update_profile(user.0, payload)
        .await?;
    Ok(Json(profile))
}
