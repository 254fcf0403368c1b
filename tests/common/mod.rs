#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use squares_api::auth::AuthMode;
use squares_api::config::AppConfig;
use squares_api::database::SquareStore;
use squares_api::testing::MemorySquareStore;
use squares_api::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the full router on a free local port for the rest of the test
    pub async fn spawn(store: Arc<dyn SquareStore>, auth: AuthMode) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let router = app(AppState::new(store, auth), &AppConfig::development());
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });

        Ok(Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Token from the placeholder login
    pub async fn login(&self) -> Result<String> {
        let res = self.client.post(self.url("/login")).send().await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    /// Create a square with a fresh token, returning its id
    pub async fn create(&self, payload: &Value) -> Result<i64> {
        let token = self.login().await?;
        let res = self
            .client
            .post(self.url("/squares"))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["id"].as_i64().context("create response has no integer id")
    }
}

/// Server with token checks on, backed by a fresh in-memory store
pub async fn protected_server() -> Result<(TestServer, Arc<MemorySquareStore>)> {
    let store = Arc::new(MemorySquareStore::new());
    let auth = AuthMode::jwt(JWT_SECRET, chrono::Duration::hours(1))?;
    let server = TestServer::spawn(store.clone(), auth).await?;
    Ok((server, store))
}

/// Server with authentication turned off
pub async fn open_server() -> Result<(TestServer, Arc<MemorySquareStore>)> {
    let store = Arc::new(MemorySquareStore::new());
    let server = TestServer::spawn(store.clone(), AuthMode::Open).await?;
    Ok((server, store))
}

pub fn sample_square() -> Value {
    json!({
        "title": "Test",
        "plane": "Test",
        "purpose": "Test",
        "class": "root",
        "depth": 0,
        "name": "Root",
        "size": 10,
        "color": "red",
        "type": "root"
    })
}
