#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::{Router, body::Body, http::Response};
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use media_gateway::config::GatewayConfig;
use media_gateway::services::clock::FixedClock;
use media_gateway::services::email_service::{EmailClient, ResendClient};
use media_gateway::services::storage::{InMemoryStorage, PutOptions, StorageService};
use media_gateway::{AppState, create_app};
use serde_json::Value;
use std::sync::Arc;

pub const NOW_MILLIS: i64 = 1_714_555_800_123;
pub const PUBLIC_URL: &str = "https://pub-f32ce6d68dac4a60b7e83a8c3aa2b5bc.r2.dev/";

/// Bucket whose writes always fail
pub struct FailingStorage;

#[async_trait]
impl StorageService for FailingStorage {
    async fn put_object(&self, _key: &str, _data: Bytes, _options: PutOptions) -> Result<()> {
        Err(anyhow::anyhow!("bucket unavailable"))
    }

    async fn list_objects(&self, _prefix: &str) -> Result<Vec<String>> {
        Err(anyhow::anyhow!("bucket unavailable"))
    }
}

pub struct TestApp {
    pub app: Router,
    pub storage: Arc<InMemoryStorage>,
}

pub fn test_app(config: GatewayConfig) -> TestApp {
    let _ = tracing_subscriber::fmt::try_init();
    let storage = Arc::new(InMemoryStorage::new());
    let mailer = config.resend_api_key.clone().map(|key| {
        Arc::new(ResendClient::new(key, config.resend_api_url.clone())) as Arc<dyn EmailClient>
    });
    let clock = Arc::new(FixedClock(Utc.timestamp_millis_opt(NOW_MILLIS).unwrap()));
    let state = AppState::new(config, storage.clone(), mailer, clock);

    TestApp {
        app: create_app(state),
        storage,
    }
}

pub fn app_with_storage(config: GatewayConfig, storage: Arc<dyn StorageService>) -> Router {
    let clock = Arc::new(FixedClock(Utc.timestamp_millis_opt(NOW_MILLIS).unwrap()));
    create_app(AppState::new(config, storage, None, clock))
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}
