//! Object store handle and the bucket operations bootstrap depends on.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::ObjectStoreSettings;

// MinIO ignores the region, but the SDK signs requests with one.
const SIGNING_REGION: &str = "us-east-1";

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("Failed to create object store client: {detail}")]
    Client { detail: String },
    #[error("{operation} for bucket {bucket} failed: {detail}")]
    Request {
        operation: &'static str,
        bucket: String,
        detail: String,
    },
}

impl ObjectStoreError {
    pub fn request(operation: &'static str, bucket: &str, detail: impl Into<String>) -> Self {
        Self::Request {
            operation,
            bucket: bucket.to_string(),
            detail: detail.into(),
        }
    }
}

/// Bucket-level operations of an S3-compatible store.
#[async_trait]
pub trait BucketApi: Send + Sync {
    async fn create_bucket(&self, bucket: &str) -> Result<(), ObjectStoreError>;

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, ObjectStoreError>;
}

/// [`BucketApi`] backed by `aws-sdk-s3` with path-style addressing.
#[derive(Clone, Debug)]
pub struct S3BucketApi {
    client: Client,
}

impl S3BucketApi {
    pub async fn connect(settings: &ObjectStoreSettings) -> Result<Self, ObjectStoreError> {
        if settings.host.trim().is_empty() {
            return Err(ObjectStoreError::Client {
                detail: "object store host must not be empty".to_string(),
            });
        }

        let timeouts = TimeoutConfig::builder()
            .connect_timeout(settings.timeout)
            .operation_timeout(settings.timeout)
            .build();
        let credentials = Credentials::new(
            settings.access_key.clone(),
            settings.secret_key.clone(),
            None,
            None,
            "object-store-config",
        );

        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(SIGNING_REGION))
            .endpoint_url(settings.endpoint())
            .credentials_provider(credentials)
            .timeout_config(timeouts)
            .load()
            .await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(true)
            .build();

        debug!(endpoint = %settings.endpoint(), "object_store=client ready");
        Ok(Self {
            client: Client::from_conf(s3_config),
        })
    }
}

#[async_trait]
impl BucketApi for S3BucketApi {
    async fn create_bucket(&self, bucket: &str) -> Result<(), ObjectStoreError> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| {
                ObjectStoreError::request("create bucket", bucket, DisplayErrorContext(&e).to_string())
            })
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, ObjectStoreError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                let not_found = e.as_service_error().is_some_and(|se| se.is_not_found())
                    || e.raw_response().map(|r| r.status().as_u16()) == Some(404);
                if not_found {
                    Ok(false)
                } else {
                    Err(ObjectStoreError::request(
                        "check bucket",
                        bucket,
                        DisplayErrorContext(&e).to_string(),
                    ))
                }
            }
        }
    }
}

/// Provisioned object store: the client plus the bucket it was prepared for.
#[derive(Clone)]
pub struct ObjectStore {
    api: Arc<dyn BucketApi>,
    bucket: String,
}

impl ObjectStore {
    pub fn new(api: Arc<dyn BucketApi>, bucket: impl Into<String>) -> Self {
        Self {
            api,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn api(&self) -> &dyn BucketApi {
        self.api.as_ref()
    }

    pub async fn bucket_exists(&self) -> Result<bool, ObjectStoreError> {
        self.api.bucket_exists(&self.bucket).await
    }
}

impl fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}
