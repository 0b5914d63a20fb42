use crate::services::storage::{InMemoryStorage, S3StorageService, StorageService};
use anyhow::{Context, Result};
use aws_sdk_s3::config::Region;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the bucket binding from `S3_*` variables.
///
/// `STORAGE_BACKEND=memory` swaps in a process-local bucket for local runs.
pub async fn setup_storage() -> Result<Arc<dyn StorageService>> {
    if env::var("STORAGE_BACKEND").is_ok_and(|v| v.eq_ignore_ascii_case("memory")) {
        warn!("🧪 Using in-memory storage; uploads are lost on exit");
        return Ok(Arc::new(InMemoryStorage::new()));
    }

    let endpoint_url = env::var("S3_ENDPOINT").context("S3_ENDPOINT must be set")?;
    let access_key = env::var("S3_ACCESS_KEY").context("S3_ACCESS_KEY must be set")?;
    let secret_key = env::var("S3_SECRET_KEY").context("S3_SECRET_KEY must be set")?;
    let bucket = env::var("S3_BUCKET").unwrap_or_else(|_| "payal54rani".to_string());
    let region = env::var("S3_REGION").unwrap_or_else(|_| "auto".to_string());

    info!("☁️  S3 Storage: {} (Bucket: {})", endpoint_url, bucket);

    let aws_config = aws_config::from_env()
        .endpoint_url(&endpoint_url)
        .region(Region::new(region))
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            access_key, secret_key, None, None, "static",
        ))
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true)
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

    // The bucket is provisioned out of band; only report whether it is reachable
    match s3_client.head_bucket().bucket(&bucket).send().await {
        Ok(_) => info!("✅ Bucket '{}' is ready", bucket),
        Err(e) => warn!("⚠️  Bucket '{}' is not reachable yet: {}", bucket, e),
    }

    Ok(Arc::new(S3StorageService::new(s3_client, bucket)))
}
