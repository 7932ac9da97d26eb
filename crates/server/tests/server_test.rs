//! # Server Endpoint Tests
//!
//! This file contains integration tests for the `mindscribe-server` endpoints
//! that do not belong to a single resource: the root banner, the health check,
//! bearer-token authentication and CORS.

mod common;

use anyhow::Result;
use chrono::Duration;
use common::{TestApp, TEST_JWT_SECRET};
use mindscribe_test_utils::{mint_token, mint_token_with_expiry};
use reqwest::Method;

#[tokio::test]
async fn test_root_and_health_check_endpoints() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;

    // --- Test Root Endpoint ---
    let root_response = app.client.get(app.url("/")).send().await?;

    // Assert
    assert!(root_response.status().is_success());
    assert_eq!("MindScribe server is running.", root_response.text().await?);

    // --- Test Health Check Endpoint ---
    let health_response = app.client.get(app.url("/health")).send().await?;

    // Assert
    assert!(health_response.status().is_success());
    assert_eq!("OK", health_response.text().await?);

    Ok(())
}

#[tokio::test]
async fn test_api_routes_require_a_token() -> Result<()> {
    let app = TestApp::spawn().await?;

    for path in ["/api/recommendations", "/api/profile", "/api/moodlogs", "/api/content"] {
        let response = app.client.get(app.url(path)).send().await?;
        assert_eq!(401, response.status().as_u16(), "GET {path} without a token");
    }

    Ok(())
}

#[tokio::test]
async fn test_invalid_tokens_are_rejected() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    let expired = mint_token_with_expiry(TEST_JWT_SECRET, "1", Duration::hours(-2))?;
    let wrong_secret = mint_token("some-other-secret", 1)?;
    let non_numeric_subject =
        mint_token_with_expiry(TEST_JWT_SECRET, "alice@example.com", Duration::hours(1))?;

    // Act & Assert
    for token in [expired, wrong_secret, non_numeric_subject, "garbage".to_string()] {
        let response = app
            .client
            .get(app.url("/api/profile"))
            .bearer_auth(&token)
            .send()
            .await?;
        assert_eq!(401, response.status().as_u16());
        let body: serde_json::Value = response.json().await?;
        assert!(body["error"].is_string());
    }

    // A valid token for the same route succeeds.
    let response = app.request_as(Method::GET, "/api/profile", 1).send().await?;
    assert_eq!(200, response.status().as_u16());

    Ok(())
}

#[tokio::test]
async fn test_malformed_json_is_rejected() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    // This JSON is syntactically invalid (missing closing brace).
    let malformed_body = r#"{"moodRating": 3"#;

    // Act
    let response = app
        .request_as(Method::POST, "/api/moodlogs", 1)
        .header("Content-Type", "application/json")
        .body(malformed_body)
        .send()
        .await?;

    // Assert
    assert_eq!(400, response.status().as_u16());

    Ok(())
}

#[tokio::test]
async fn test_cors_allows_the_configured_origin() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .get(app.url("/health"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await?;

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );

    Ok(())
}
