//! # Configuration Tests
//!
//! This file contains tests for the configuration loading logic: file
//! loading with `${VAR}` substitution, environment overrides and the required
//! JWT secret.

use mindscribe_server::config::{get_config, ConfigError};
use std::env;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

// A mutex to ensure that tests modifying the environment run sequentially.
// Environment variables are process-global and tests run in parallel by default.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Clears every environment variable `get_config` reads.
fn clear_env_vars() {
    for key in [
        "PORT",
        "DB_URL",
        "JWT_SECRET",
        "CORS_ORIGIN",
        "MINDSCRIBE_PORT",
        "MINDSCRIBE_DB_URL",
        "MINDSCRIBE_JWT_SECRET",
        "MINDSCRIBE_CORS_ORIGIN",
        "TEST_JWT_FROM_FILE",
    ] {
        env::remove_var(key);
    }
}

#[test]
fn test_get_config_defaults_with_env_secret() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, "# everything defaulted\n{}\n").unwrap();

    env::set_var("JWT_SECRET", "from-env");

    let config = get_config(Some(path.to_str().unwrap())).expect("Configuration should load");

    assert_eq!(config.port, 5001);
    assert_eq!(config.db_url, "db/mindscribe.db");
    assert_eq!(config.cors_origin, "http://localhost:3000");
    assert_eq!(config.jwt_secret, "from-env");

    clear_env_vars();
}

#[test]
fn test_get_config_file_values_and_substitution() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(
        &path,
        r#"
port: 7000
db_url: "/tmp/mindscribe-test.db"
jwt_secret: "${TEST_JWT_FROM_FILE}"
cors_origin: "https://app.example.com"
"#,
    )
    .unwrap();

    env::set_var("TEST_JWT_FROM_FILE", "substituted-secret");

    let config = get_config(Some(path.to_str().unwrap())).expect("Configuration should load");

    assert_eq!(config.port, 7000);
    assert_eq!(config.db_url, "/tmp/mindscribe-test.db");
    assert_eq!(config.jwt_secret, "substituted-secret");
    assert_eq!(config.cors_origin, "https://app.example.com");

    clear_env_vars();
}

#[test]
fn test_environment_overrides_file() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, "port: 7000\njwt_secret: \"file-secret\"\n").unwrap();

    env::set_var("PORT", "8123");
    env::set_var("MINDSCRIBE_CORS_ORIGIN", "https://prefixed.example.com");

    let config = get_config(Some(path.to_str().unwrap())).expect("Configuration should load");

    assert_eq!(config.port, 8123);
    assert_eq!(config.jwt_secret, "file-secret");
    assert_eq!(config.cors_origin, "https://prefixed.example.com");

    clear_env_vars();
}

#[test]
fn test_missing_jwt_secret_is_an_error() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    // An unset variable substitutes to an empty string.
    fs::write(&path, "jwt_secret: \"${TEST_JWT_FROM_FILE}\"\n").unwrap();

    let result = get_config(Some(path.to_str().unwrap()));

    assert!(matches!(result, Err(ConfigError::Missing("jwt_secret"))));
    clear_env_vars();
}

#[test]
fn test_missing_explicit_config_file_is_not_found() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    env::set_var("JWT_SECRET", "from-env");

    let result = get_config(Some("/definitely/not/here/config.yml"));

    assert!(matches!(result, Err(ConfigError::NotFound(_))));
    clear_env_vars();
}
