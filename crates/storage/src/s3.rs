//! S3 storage backend
//!
//! Thin wrapper over the AWS SDK client: single-object put/get/delete,
//! leaving retry behavior to the SDK's own configuration. Supports custom
//! endpoints (MinIO, LocalStack, s3rver) and static credentials for local
//! stacks.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Credentials, Region},
    primitives::ByteStream,
    Client,
};
use bytes::Bytes;
use store_core::config::{S3Options, SharedOptions};
use store_core::{Error, Result};
use tracing::{debug, instrument};

use crate::StorageBackend;

/// S3-compatible storage backend
///
/// Keys map 1:1 to object names inside the configured bucket. Connection
/// parameters are pass-through configuration; the adapter never
/// reinterprets them.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Create a backend from pass-through client options and the shared
    /// request defaults (target bucket)
    ///
    /// Credentials fall back to the SDK's default chain (environment,
    /// profile, instance role) when no static pair is configured.
    pub async fn new(options: &S3Options, shared: &SharedOptions) -> Self {
        let region = options
            .region
            .clone()
            .unwrap_or_else(|| "us-east-1".to_string());

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));

        if let (Some(access_key), Some(secret_key)) =
            (&options.access_key_id, &options.secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "store-config",
            ));
        }

        let aws_config = loader.load().await;
        let mut builder = S3ConfigBuilder::from(&aws_config);

        if let Some(endpoint) = &options.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        if options.force_path_style {
            builder = builder.force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: shared.bucket.clone(),
        }
    }

    /// Create a backend over an existing client (shared or preconfigured)
    pub fn with_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// The target bucket
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The underlying SDK client, for diagnostic use
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl StorageBackend for S3Storage {
    #[instrument(skip(self, data), fields(backend = "s3", bucket = %self.bucket, size = data.len()))]
    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        debug!(%key, "Writing to S3");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| Error::Storage {
                message: format!("S3 put_object failed: {}", e),
            })?;

        Ok(())
    }

    #[instrument(skip(self), fields(backend = "s3", bucket = %self.bucket))]
    async fn get(&self, key: &str) -> Result<Bytes> {
        debug!(%key, "Reading from S3");

        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    Error::NotFound {
                        key: key.to_string(),
                    }
                } else {
                    Error::Storage {
                        message: format!("S3 get_object failed: {}", e),
                    }
                }
            })?;

        let data = result.body.collect().await.map_err(|e| Error::Storage {
            message: format!("Failed to read S3 response body: {}", e),
        })?;

        Ok(data.into_bytes())
    }

    #[instrument(skip(self), fields(backend = "s3", bucket = %self.bucket))]
    async fn delete(&self, key: &str) -> Result<()> {
        debug!(%key, "Deleting from S3");

        // S3 reports success for a missing object, which matches the
        // already-absent semantics of the trait contract.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Storage {
                message: format!("S3 delete_object failed: {}", e),
            })?;

        Ok(())
    }
}
