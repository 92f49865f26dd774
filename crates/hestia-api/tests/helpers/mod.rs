//! Test helpers: build the router against in-memory gates, a scripted generator and
//! local storage in a temp dir.
//!
//! The pool is created lazily and never connects, so only routes that fail or answer before
//! touching the database are exercised here; repository behavior is covered in `hestia-db`.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use axum_test::TestServer;
use hestia_api::setup::routes;
use hestia_api::state::{AppState, GateState};
use hestia_core::{AppConfig, Config, StorageBackend};
use hestia_storage::{LocalStorage, Storage};
use hestia_worker::test_helpers::ScriptedGenerator;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const MEDIA_BASE_URL: &str = "http://localhost:3000/media";

pub fn api_path(path: &str) -> String {
    format!("{}{}", hestia_api::constants::API_PREFIX, path)
}

pub struct TestApp {
    pub server: TestServer,
    pub generator: ScriptedGenerator,
    pub credits: Arc<auth::InMemoryCredits>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Configuration with zero backoff so throttling paths run instantly.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.retry.default_delay_secs = 0;
    config.retry.max_delay_secs = 0;
    config.storage.backend = StorageBackend::Local;
    config
}

pub async fn setup_test_app() -> TestApp {
    TestAppBuilder::new().build().await
}

pub struct TestAppBuilder {
    config: AppConfig,
    generator: ScriptedGenerator,
    credits: i32,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            config: test_config(),
            generator: ScriptedGenerator::new(),
            credits: 10,
        }
    }

    pub fn generator(mut self, generator: ScriptedGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn credits(mut self, credits: i32) -> Self {
        self.credits = credits;
        self
    }

    pub fn configure(mut self, f: impl FnOnce(&mut AppConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub async fn build(self) -> TestApp {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(temp_dir.path(), MEDIA_BASE_URL.to_string())
                .await
                .unwrap(),
        );

        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(&self.config.database_url)
            .unwrap();

        let credits = Arc::new(auth::InMemoryCredits::new(self.credits));
        let gates = GateState {
            sessions: Arc::new(auth::InMemorySessions::new()),
            credits: credits.clone(),
        };

        let config = Config::from_app_config(self.config);
        let state = AppState::new(
            config.clone(),
            pool,
            storage,
            Arc::new(self.generator.clone()),
            gates,
        )
        .unwrap();

        let router = routes::setup_routes(&config, Arc::new(state)).await.unwrap();

        TestApp {
            server: TestServer::new(router).unwrap(),
            generator: self.generator,
            credits,
            temp_dir,
        }
    }
}
