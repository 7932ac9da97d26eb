//! # Recommendation Handler

use super::{AppError, AppState};
use crate::auth::middleware::AuthenticatedUser;
use axum::{extract::State, Json};
use mindscribe::{recommend, Recommendations};
use tracing::info;

/// Returns up to five content recommendations for the caller.
pub async fn recommendations_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Recommendations>, AppError> {
    info!(user_id = user.0, "Received recommendations request.");
    let result = recommend(&*app_state.sqlite_provider, user.0).await?;
    info!(
        user_id = user.0,
        count = result.recommendations.len(),
        "Returning recommendations."
    );
    Ok(Json(result))
}
