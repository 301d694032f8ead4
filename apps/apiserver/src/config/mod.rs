//! Startup configuration.
//!
//! Values are looked up through [`ConfigResolver`] so the same resolution code
//! runs against the process environment and against in-memory maps in tests.
//! Every value is resolved before any external service is contacted.

pub mod cluster;
pub mod db;
pub mod object_store;

use std::collections::HashMap;
use std::time::Duration;

use crate::error::BootstrapError;

pub use cluster::ClusterSettings;
pub use object_store::ObjectStoreSettings;

pub mod keys {
    pub const DB_DRIVER_NAME: &str = "DBConfig.DriverName";
    pub const DB_USER: &str = "DBConfig.User";
    pub const DB_PASSWORD: &str = "DBConfig.Password";
    pub const DB_NAME: &str = "DBConfig.DBName";
    pub const DB_SQLITE_PATH: &str = "DBConfig.SqlitePath";
    pub const MYSQL_SERVICE_HOST: &str = "MYSQL_SERVICE_HOST";
    pub const MYSQL_SERVICE_PORT: &str = "MYSQL_SERVICE_PORT";

    pub const MINIO_SERVICE_HOST: &str = "MINIO_SERVICE_SERVICE_HOST";
    pub const MINIO_SERVICE_PORT: &str = "MINIO_SERVICE_SERVICE_PORT";
    pub const OBJECT_STORE_ACCESS_KEY: &str = "ObjectStoreConfig.AccessKey";
    pub const OBJECT_STORE_SECRET_KEY: &str = "ObjectStoreConfig.SecretAccessKey";
    pub const OBJECT_STORE_BUCKET: &str = "ObjectStoreConfig.BucketName";

    pub const POD_NAMESPACE: &str = "POD_NAMESPACE";
    pub const KUBERNETES_SERVICE_HOST: &str = "KUBERNETES_SERVICE_HOST";
    pub const KUBERNETES_SERVICE_PORT: &str = "KUBERNETES_SERVICE_PORT";
    pub const SERVICE_ACCOUNT_DIR: &str = "ServiceAccountDir";

    pub const INIT_CONNECTION_TIMEOUT: &str = "InitConnectionTimeout";
}

/// Read-only view over startup configuration.
pub trait ConfigResolver: Send + Sync {
    /// Raw lookup. Returns `None` when the key is not set.
    fn lookup(&self, key: &str) -> Option<String>;

    /// Required, non-empty value.
    fn get_string(&self, key: &str) -> Result<String, BootstrapError> {
        match self.lookup(key) {
            Some(v) if !v.trim().is_empty() => Ok(v),
            Some(_) => Err(BootstrapError::config(format!("{key} must not be empty"))),
            None => Err(BootstrapError::config(format!("{key} must be set"))),
        }
    }

    /// Optional value; unset or empty yields `default`.
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.lookup(key)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Required duration in Go syntax, e.g. `30s`, `1m30s`.
    fn get_duration(&self, key: &str) -> Result<Duration, BootstrapError> {
        let raw = self.get_string(key)?;
        parse_duration(&raw)
            .ok_or_else(|| BootstrapError::config(format!("{key} is not a valid duration: '{raw}'")))
    }

    /// Required TCP port.
    fn get_port(&self, key: &str) -> Result<u16, BootstrapError> {
        let raw = self.get_string(key)?;
        raw.trim()
            .parse::<u16>()
            .map_err(|_| BootstrapError::config(format!("{key} must be a valid port number, got '{raw}'")))
    }
}

/// Resolves keys from the process environment.
///
/// `DBConfig.DriverName` is read from `DBCONFIG_DRIVERNAME`; keys that are
/// already environment-style (`POD_NAMESPACE`) map to themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl EnvConfig {
    pub fn env_key(key: &str) -> String {
        key.replace('.', "_").to_uppercase()
    }
}

impl ConfigResolver for EnvConfig {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(Self::env_key(key)).ok()
    }
}

/// In-memory configuration keyed by the dotted names.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

impl ConfigResolver for MapConfig {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parses a Go-style duration: one or more `<decimal><unit>` groups.
///
/// Units are `ns`, `us`, `µs`, `ms`, `s`, `m`, `h`. A bare `0` is zero.
/// Negative durations are rejected.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let s = input.trim();
    if s == "0" {
        return Some(Duration::ZERO);
    }
    if s.is_empty() {
        return None;
    }

    let mut rest = s;
    let mut total = 0f64;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (num, tail) = rest.split_at(num_len);
        if num.is_empty() || num == "." {
            return None;
        }
        let value: f64 = num.parse().ok()?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let nanos_per_unit = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };

        total += value * nanos_per_unit;
        rest = next;
    }

    if !total.is_finite() || total > u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(total.round() as u64))
}

/// Everything bootstrap needs, resolved up front.
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    pub db: db_infra::ConnectionTarget,
    pub object_store: ObjectStoreSettings,
    pub cluster: ClusterSettings,
    pub init_connection_timeout: Duration,
}

impl BootstrapSettings {
    pub fn resolve(config: &dyn ConfigResolver) -> Result<Self, BootstrapError> {
        let init_connection_timeout = config.get_duration(keys::INIT_CONNECTION_TIMEOUT)?;
        Ok(Self {
            db: db::connection_target(config)?,
            object_store: ObjectStoreSettings::resolve(config, init_connection_timeout)?,
            cluster: ClusterSettings::resolve(config, init_connection_timeout)?,
            init_connection_timeout,
        })
    }
}
