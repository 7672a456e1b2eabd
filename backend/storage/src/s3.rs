//! AWS S3 backend.

use std::path::Path;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use linestash_config::StorageConfig;
use linestash_core::{ObjectStore, StashError};
use tracing::{debug, info};

pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self { client, bucket: bucket.into() }
    }

    /// Build a client from the storage section.
    ///
    /// Explicit credentials win over the default provider chain; a custom
    /// endpoint switches to path-style addressing.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, StashError> {
        let bucket = config
            .bucket
            .clone()
            .ok_or_else(|| StashError::Config("storage.bucket is required for s3".into()))?;
        let region = config
            .region
            .clone()
            .ok_or_else(|| StashError::Config("storage.region is required for s3".into()))?;

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.clone()));
        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id.clone(),
                secret.clone(),
                config.session_token.clone(),
                None,
                "linestash-config",
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        info!(bucket = %bucket, region = %region, endpoint = ?config.endpoint_url, "S3 store ready");
        Ok(Self::new(Client::from_conf(builder.build()), bucket))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        "s3"
    }

    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: Option<&str>,
    ) -> Result<(), StashError> {
        let body = ByteStream::from_path(local_path).await.map_err(|e| StashError::UploadFailed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let mut request = self.client.put_object().bucket(&self.bucket).key(key).body(body);
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }
        request.send().await.map_err(|e| StashError::UploadFailed {
            key: key.to_string(),
            reason: DisplayErrorContext(&e).to_string(),
        })?;

        debug!(bucket = %self.bucket, key, content_type, "Uploaded object");
        Ok(())
    }
}
