//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup.

use crate::config::AppConfig;
use mindscribe::{constants::DB_DIR, providers::db::sqlite::SqliteProvider};
use std::{path::Path, sync::Arc};
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The database provider for every MindScribe table.
    pub sqlite_provider: Arc<SqliteProvider>,
}

/// Builds the shared application state from the configuration.
///
/// Opens the SQLite database (creating the default `db/` directory when the
/// default location is used) and brings the schema up to date.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    if let Some(parent) = Path::new(&config.db_url).parent() {
        if parent == Path::new(DB_DIR) && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    info!(db_path = %config.db_url, "Initialized local storage provider (SQLite).");
    sqlite_provider.initialize_schema().await?;

    Ok(AppState {
        config: Arc::new(config),
        sqlite_provider: Arc::new(sqlite_provider),
    })
}
