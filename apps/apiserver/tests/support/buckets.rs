use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use apiserver::storage::{BucketApi, ObjectStoreError};
use async_trait::async_trait;

/// In-memory bucket API that answers like an S3-compatible server.
#[derive(Default)]
pub struct FakeBuckets {
    buckets: Mutex<HashSet<String>>,
    create_calls: AtomicU32,
    deny_create: bool,
}

impl FakeBuckets {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_existing(bucket: &str) -> Arc<Self> {
        let fake = Self::default();
        fake.buckets.lock().unwrap().insert(bucket.to_string());
        Arc::new(fake)
    }

    /// Every create fails, as it does for credentials without create rights.
    pub fn read_only() -> Arc<Self> {
        Arc::new(Self {
            deny_create: true,
            ..Self::default()
        })
    }

    pub fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BucketApi for FakeBuckets {
    async fn create_bucket(&self, bucket: &str) -> Result<(), ObjectStoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.deny_create {
            return Err(ObjectStoreError::request("create bucket", bucket, "AccessDenied"));
        }
        if !self.buckets.lock().unwrap().insert(bucket.to_string()) {
            return Err(ObjectStoreError::request(
                "create bucket",
                bucket,
                "BucketAlreadyOwnedByYou",
            ));
        }
        Ok(())
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, ObjectStoreError> {
        Ok(self.buckets.lock().unwrap().contains(bucket))
    }
}
