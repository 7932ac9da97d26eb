//! # Application Configuration
//!
//! This module defines the configuration structure for the `mindscribe-server`
//! and the logic for loading it from a `config.yml` file and environment
//! variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use mindscribe::constants::DEFAULT_DB_FILE;
use regex::Regex;
use serde::Deserialize;
use std::{env, fs, path::Path};
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
    /// A required value is missing or empty.
    Missing(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
            ConfigError::Missing(key) => write!(f, "Configuration value '{key}' must be set"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// The HS256 secret used to verify bearer tokens. Loaded from `JWT_SECRET`.
    #[serde(default)]
    pub jwt_secret: String,
    /// The frontend origin allowed by CORS. Loaded from `CORS_ORIGIN`.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

// The secret never shows up in logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("db_url", &self.db_url)
            .field("jwt_secret", &"<redacted>")
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

fn default_port() -> u16 {
    5001
}

fn default_db_url() -> String {
    DEFAULT_DB_FILE.to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - With an explicit path, that file must exist.
/// - Without one, `config.yml` next to the crate manifest is used if present;
///   otherwise defaults and the environment alone are used.
/// - Top-level keys are overridden by `PORT`, `DB_URL`, `JWT_SECRET` and
///   `CORS_ORIGIN`, then by `MINDSCRIBE_...` variables.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults.
        .set_default("port", i64::from(default_port()))?
        .set_default("db_url", default_db_url())?
        .set_default("cors_origin", default_cors_origin())?;

    // Layer 2: Main config file.
    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            if let Some(content) = read_and_substitute(&user_config_path)? {
                info!("Loading user-defined configuration from '{user_config_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            } else {
                info!("'{user_config_path}' not found. Using defaults and environment.");
            }
        }
    }

    let settings = builder
        // Layer 3: Environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Prefixed environment variables for explicit overrides.
        .add_source(
            Environment::with_prefix("MINDSCRIBE")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;

    if config.jwt_secret.trim().is_empty() {
        return Err(ConfigError::Missing("jwt_secret"));
    }

    Ok(config)
}
