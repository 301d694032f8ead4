use std::path::PathBuf;
use std::time::Duration;

use super::{keys, ConfigResolver};
use crate::error::BootstrapError;

pub const DEFAULT_SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// Where the orchestration API server lives and which namespace we act in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    pub api_host: String,
    pub api_port: u16,
    pub namespace: String,
    pub service_account_dir: PathBuf,
    pub timeout: Duration,
}

impl ClusterSettings {
    pub fn resolve(config: &dyn ConfigResolver, timeout: Duration) -> Result<Self, BootstrapError> {
        Ok(Self {
            api_host: config.get_string(keys::KUBERNETES_SERVICE_HOST)?,
            api_port: config.get_port(keys::KUBERNETES_SERVICE_PORT)?,
            namespace: config.get_string(keys::POD_NAMESPACE)?.trim().to_string(),
            service_account_dir: PathBuf::from(
                config.get_string_or(keys::SERVICE_ACCOUNT_DIR, DEFAULT_SERVICE_ACCOUNT_DIR),
            ),
            timeout,
        })
    }

    pub fn api_base(&self) -> String {
        // IPv6 service hosts need brackets in URLs.
        if self.api_host.contains(':') {
            format!("https://[{}]:{}", self.api_host, self.api_port)
        } else {
            format!("https://{}:{}", self.api_host, self.api_port)
        }
    }
}
