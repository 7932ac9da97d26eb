//! # Content Route Handlers
//!
//! Catalogue browsing and maintenance, plus the per-user interaction records
//! (views, ratings, helpfulness) attached to each item.

use super::{AppError, AppState};
use crate::auth::middleware::AuthenticatedUser;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mindscribe::types::{
    ContentFilter, ContentItem, ContentType, ContentUpdate, InteractionRecord,
    InteractionUpdate, NewContentItem,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

// --- API Payloads for Content ---

/// Query parameters for `GET /api/content`, e.g.
/// `?tags=anxiety,mindfulness&type=article&search=breathing`.
#[derive(Debug, Deserialize, Default)]
pub struct ContentListParams {
    pub tags: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub search: Option<String>,
}

impl ContentListParams {
    fn into_filter(self) -> Result<ContentFilter, AppError> {
        let tags = self
            .tags
            .map(|t| t.split(',').map(str::to_string).collect())
            .unwrap_or_default();
        let content_type = self
            .content_type
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.parse::<ContentType>())
            .transpose()?;
        Ok(ContentFilter {
            tags,
            content_type,
            search: self.search,
        })
    }
}

// --- Catalogue Handlers ---

/// Lists content items, most recently updated first.
pub async fn list_content_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<ContentListParams>,
) -> Result<Json<Vec<ContentItem>>, AppError> {
    let filter = params.into_filter()?;
    let items = app_state.sqlite_provider.list_content(&filter).await?;
    Ok(Json(items))
}

/// Fetches a single content item.
pub async fn get_content_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ContentItem>, AppError> {
    app_state
        .sqlite_provider
        .get_content(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Content item".to_string()))
}

/// Creates a content item.
pub async fn create_content_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<NewContentItem>,
) -> Result<(StatusCode, Json<ContentItem>), AppError> {
    info!(user_id = user.0, title = %payload.title, "Creating content item.");
    let item = app_state.sqlite_provider.create_content(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Applies a partial update to a content item.
pub async fn update_content_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<ContentUpdate>,
) -> Result<Json<ContentItem>, AppError> {
    info!(user_id = user.0, content_id = id, "Updating content item.");
    let item = app_state.sqlite_provider.update_content(id, payload).await?;
    Ok(Json(item))
}

/// Deletes a content item and its interactions.
pub async fn delete_content_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    info!(user_id = user.0, content_id = id, "Deleting content item.");
    if !app_state.sqlite_provider.delete_content(id).await? {
        return Err(AppError::NotFound("Content item".to_string()));
    }
    Ok(Json(json!({ "msg": "Content item removed successfully" })))
}

// --- Interaction Handlers ---

/// Records a view, rating or feedback from the caller on a content item.
pub async fn record_interaction_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<InteractionUpdate>,
) -> Result<Json<InteractionRecord>, AppError> {
    let record = app_state
        .sqlite_provider
        .record_interaction(user.0, id, payload)
        .await?;
    Ok(Json(record))
}

/// Returns the caller's interaction with a content item. Callers that never
/// interacted get an empty record instead of a 404.
pub async fn my_interaction_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    match app_state.sqlite_provider.get_interaction(user.0, id).await? {
        Some(record) => Ok(Json(
            serde_json::to_value(record).map_err(|e| AppError::Internal(e.into()))?,
        )),
        None => Ok(Json(json!({
            "rating": null,
            "isHelpful": null,
            "feedbackText": ""
        }))),
    }
}
