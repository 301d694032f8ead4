use std::fmt;
use std::time::Duration;

use super::{keys, ConfigResolver};
use crate::error::BootstrapError;

/// Connection details for the S3-compatible object store.
#[derive(Clone, PartialEq, Eq)]
pub struct ObjectStoreSettings {
    pub host: String,
    pub port: u16,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub timeout: Duration,
}

impl ObjectStoreSettings {
    pub fn resolve(config: &dyn ConfigResolver, timeout: Duration) -> Result<Self, BootstrapError> {
        let bucket = config.get_string(keys::OBJECT_STORE_BUCKET)?;
        validate_bucket_name(&bucket)?;

        Ok(Self {
            host: config.get_string(keys::MINIO_SERVICE_HOST)?,
            port: config.get_port(keys::MINIO_SERVICE_PORT)?,
            access_key: config.get_string(keys::OBJECT_STORE_ACCESS_KEY)?,
            secret_key: config.get_string(keys::OBJECT_STORE_SECRET_KEY)?,
            bucket,
            timeout,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ObjectStoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreSettings")
            .field("endpoint", &self.endpoint())
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("bucket", &self.bucket)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// S3 naming rules: 3-63 chars of lowercase letters, digits, '-' and '.',
// starting and ending with a letter or digit.
fn validate_bucket_name(name: &str) -> Result<(), BootstrapError> {
    let len_ok = (3..=63).contains(&name.len());
    let chars_ok = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let edges_ok = name
        .chars()
        .next()
        .zip(name.chars().last())
        .is_some_and(|(a, b)| a.is_ascii_alphanumeric() && b.is_ascii_alphanumeric());

    if len_ok && chars_ok && edges_ok {
        Ok(())
    } else {
        Err(BootstrapError::config(format!(
            "{} '{name}' is not a valid bucket name",
            keys::OBJECT_STORE_BUCKET
        )))
    }
}
