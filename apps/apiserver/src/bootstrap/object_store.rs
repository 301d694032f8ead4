use tracing::{info, warn};

use crate::storage::object_store::{BucketApi, ObjectStoreError};

/// Outcome of a successful [`provision_bucket`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketProvisioning {
    Created,
    AlreadyExisted,
}

/// Makes sure `bucket` exists.
///
/// Creation is attempted first. When it fails the bucket is looked up: an
/// existing bucket counts as success, otherwise the creation error is returned.
/// Calling this repeatedly is safe.
pub async fn provision_bucket(
    api: &dyn BucketApi,
    bucket: &str,
) -> Result<BucketProvisioning, ObjectStoreError> {
    let create_err = match api.create_bucket(bucket).await {
        Ok(()) => {
            info!(bucket, "object_store=bucket created");
            return Ok(BucketProvisioning::Created);
        }
        Err(e) => e,
    };

    match api.bucket_exists(bucket).await {
        Ok(true) => {
            info!(bucket, "object_store=bucket already exists");
            Ok(BucketProvisioning::AlreadyExisted)
        }
        Ok(false) => {
            warn!(bucket, error = %create_err, "object_store=bucket missing after failed create");
            Err(create_err)
        }
        Err(check_err) => {
            warn!(bucket, create_error = %create_err, "object_store=bucket check failed");
            Err(check_err)
        }
    }
}
