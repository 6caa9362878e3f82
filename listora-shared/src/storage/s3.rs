//! S3-compatible object store
//!
//! Works against AWS S3 and S3-compatible services (Cloudflare R2, MinIO)
//! via a custom endpoint. Path-style addressing is the default since most
//! compatible services require it.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{timeout::TimeoutConfig, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Region, StalledStreamProtectionConfig},
    primitives::ByteStream,
    Client,
};
use tracing::debug;

use super::ObjectStore;

/// Configuration for an S3-compatible bucket
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Service endpoint, e.g. "https://<account>.r2.cloudflarestorage.com"
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base URL objects are publicly served from, e.g. a CDN domain
    pub public_base_url: String,
    pub force_path_style: bool,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl S3Config {
    pub fn new(
        endpoint: String,
        region: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        public_base_url: String,
    ) -> Self {
        Self {
            endpoint,
            region,
            bucket,
            access_key,
            secret_key,
            public_base_url,
            force_path_style: true,
            connect_timeout_secs: 10,
            read_timeout_secs: 60,
        }
    }
}

/// Object store backed by an S3-compatible bucket
pub struct S3Store {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Store {
    /// Builds the SDK client and wraps it
    pub async fn new(config: &S3Config) -> Result<Self> {
        let endpoint = format!("{}/", config.endpoint.trim_end_matches('/'));

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "s3-compatible",
        );

        let region = Region::new(config.region.clone());
        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region.clone())
            .credentials_provider(credentials)
            .timeout_config(
                TimeoutConfig::builder()
                    .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
                    .read_timeout(Duration::from_secs(config.read_timeout_secs))
                    .build(),
            )
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .endpoint_url(endpoint)
            .force_path_style(config.force_path_style)
            .region(region)
            .stalled_stream_protection(StalledStreamProtectionConfig::disabled())
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        debug!(key, content_type, size = bytes.len(), "Uploading object to S3");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .with_context(|| format!("failed to upload object {}", key))?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        debug!(key, "Deleting object from S3");

        // DeleteObject is idempotent, a missing key still returns success.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("failed to delete object {}", key))?;

        Ok(())
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_base_url)
            .map(|rest| rest.trim_start_matches('/').to_string())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = S3Config::new(
            "https://example.r2.cloudflarestorage.com".to_string(),
            "auto".to_string(),
            "uploads".to_string(),
            "key".to_string(),
            "secret".to_string(),
            "https://cdn.example.com".to_string(),
        );

        assert!(config.force_path_style);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.read_timeout_secs, 60);
    }
}
