//! Object storage publisher for rendered plots (S3 compatible).

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{aws::AmazonS3Builder, path::Path, ClientOptions, ObjectStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use raob_common::{RaobError, RaobResult};

pub const DEFAULT_REGION: &str = "us-east-1";

/// Configuration for object storage connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    /// S3/MinIO endpoint URL
    pub endpoint: String,
    /// Bucket name
    pub bucket: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// AWS region
    pub region: String,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
}

impl ObjectStorageConfig {
    /// Read the configuration from process environment variables.
    ///
    /// Returns `None` unless `S3_BUCKET_NAME`, `S3_ENDPOINT_URL`,
    /// `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` are all set and non-empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bucket = get("S3_BUCKET_NAME")?;
        let endpoint = get("S3_ENDPOINT_URL")?;
        let access_key_id = get("AWS_ACCESS_KEY_ID")?;
        let secret_access_key = get("AWS_SECRET_ACCESS_KEY")?;
        let region = get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());

        Some(Self {
            allow_http: endpoint.starts_with("http://"),
            endpoint,
            bucket,
            access_key_id,
            secret_access_key,
            region,
        })
    }
}

/// Destination for rendered artifacts.
///
/// `publish` stores the bytes under `key` and returns a locator a caller can
/// retrieve them from.
#[async_trait]
pub trait ArtifactPublisher: Send + Sync {
    async fn publish(&self, key: &str, data: Bytes) -> RaobResult<String>;
}

/// Object storage client for rendered plots.
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    endpoint: String,
    bucket: String,
}

impl ObjectStorage {
    /// Create a new object storage client from config.
    pub fn new(config: &ObjectStorageConfig) -> RaobResult<Self> {
        let client_options = ClientOptions::new().with_content_type_for_suffix("png", "image/png");

        let mut builder = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_region(&config.region)
            .with_client_options(client_options);

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| RaobError::Storage(format!("Failed to create S3 client: {}", e)))?;

        info!(endpoint = %config.endpoint, bucket = %config.bucket, "Object storage configured");

        Ok(Self::with_store(
            Arc::new(store),
            &config.endpoint,
            &config.bucket,
        ))
    }

    /// Wrap an existing store. Used with `object_store::memory::InMemory` in tests.
    pub fn with_store(store: Arc<dyn ObjectStore>, endpoint: &str, bucket: &str) -> Self {
        Self {
            store,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        }
    }

    /// Public locator for an object key.
    /// Format: {endpoint}/{bucket}/{key}
    pub fn locator(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }

    /// Write bytes to a path in the bucket.
    #[instrument(skip(self, data), fields(bucket = %self.bucket, path = %path))]
    pub async fn put(&self, path: &str, data: Bytes) -> RaobResult<()> {
        let location = Path::from(path);
        debug!(size = data.len(), "Writing object");

        self.store
            .put(&location, data.into())
            .await
            .map_err(|e| RaobError::Storage(format!("Failed to write {}: {}", path, e)))?;

        Ok(())
    }
}

#[async_trait]
impl ArtifactPublisher for ObjectStorage {
    async fn publish(&self, key: &str, data: Bytes) -> RaobResult<String> {
        self.put(key, data).await?;
        Ok(self.locator(key))
    }
}

/// Key builder for published artifacts.
pub struct ArtifactPath;

impl ArtifactPath {
    /// Build the key for a rendered plot.
    /// Format: {prefix}_{station}_{timestamp}.png with every ':' removed
    pub fn plot(prefix: &str, station: &str, timestamp: &str) -> String {
        format!("{}_{}_{}.png", prefix, station, timestamp).replace(':', "")
    }
}
