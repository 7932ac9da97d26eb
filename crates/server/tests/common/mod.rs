//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `mindscribe-server`
//! integration tests.
//!
//! - `TestApp`: spawns the real router on a random port, backed by a temporary
//!   SQLite database file, and mints bearer tokens for arbitrary users.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use mindscribe_server::{
    config::AppConfig,
    router,
    state::{build_app_state, AppState},
};
use mindscribe_test_utils::mint_token;
use reqwest::{Client, Method, RequestBuilder};
use std::net::SocketAddr;
use tempfile::NamedTempFile;
use tokio::{net::TcpListener, task::JoinHandle};

pub const TEST_JWT_SECRET: &str = "mindscribe-test-secret";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub app_state: AppState,
    _db_file: NamedTempFile,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server with a fresh database.
    pub async fn spawn() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let db_file = NamedTempFile::new()?;
        let config = AppConfig {
            port: 0,
            db_url: db_file.path().to_string_lossy().into_owned(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            cors_origin: "http://localhost:3000".to_string(),
        };
        let app_state = build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            app_state: app_state_for_harness,
            _db_file: db_file,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// A bearer token for `user_id` signed with the test secret.
    pub fn token(&self, user_id: i64) -> String {
        mint_token(TEST_JWT_SECRET, user_id).expect("Failed to mint test token")
    }

    /// Starts a request authenticated as `user_id`.
    pub fn request_as(&self, method: Method, path: &str, user_id: i64) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(self.token(user_id))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
