//! Namespace-scoped handles to the cluster API server.
//!
//! Only creation happens at startup; request semantics live with the callers.

use std::io::ErrorKind;
use std::path::Path;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::debug;

use crate::config::ClusterSettings;
use crate::error::BootstrapError;

const TOKEN_FILE: &str = "token";
const CA_FILE: &str = "ca.crt";

/// Service-account material mounted into the pod. Both parts are optional so
/// the server can also run against an unauthenticated API endpoint.
#[derive(Clone, Default)]
pub struct ClusterCredentials {
    token: Option<String>,
    ca_pem: Option<Vec<u8>>,
}

impl ClusterCredentials {
    pub fn new(token: Option<String>, ca_pem: Option<Vec<u8>>) -> Self {
        Self { token, ca_pem }
    }

    /// Reads `token` and `ca.crt` from `dir`. Missing files are skipped.
    pub async fn load(dir: &Path) -> Result<Self, BootstrapError> {
        let token = read_optional(&dir.join(TOKEN_FILE))
            .await?
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
            .filter(|t| !t.is_empty());
        let ca_pem = read_optional(&dir.join(CA_FILE)).await?;

        debug!(
            dir = %dir.display(),
            token = token.is_some(),
            ca = ca_pem.is_some(),
            "orchestration=credentials loaded"
        );
        Ok(Self { token, ca_pem })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for ClusterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterCredentials")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("ca_pem", &self.ca_pem.as_ref().map(Vec::len))
            .finish()
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, BootstrapError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BootstrapError::config(format!(
            "failed to read {}: {e}",
            path.display()
        ))),
    }
}

/// DNS-1123 label: 1-63 lowercase alphanumerics or '-', alphanumeric at both ends.
pub fn validate_namespace(namespace: &str) -> Result<(), String> {
    if namespace.is_empty() || namespace.len() > 63 {
        return Err(format!("namespace '{namespace}' must be 1-63 characters"));
    }
    if !namespace
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(format!(
            "namespace '{namespace}' may only contain lowercase letters, digits and '-'"
        ));
    }
    if namespace.starts_with('-') || namespace.ends_with('-') {
        return Err(format!(
            "namespace '{namespace}' must start and end with an alphanumeric character"
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct ResourceKind {
    client: &'static str,
    group: &'static str,
    version: &'static str,
    plural: &'static str,
}

const WORKFLOWS: ResourceKind = ResourceKind {
    client: "workflow",
    group: "argoproj.io",
    version: "v1alpha1",
    plural: "workflows",
};

const SCHEDULED_WORKFLOWS: ResourceKind = ResourceKind {
    client: "scheduled workflow",
    group: "kubeflow.org",
    version: "v1alpha1",
    plural: "scheduledworkflows",
};

#[derive(Debug, Clone)]
struct ResourceClient {
    http: reqwest::Client,
    namespace: String,
    collection_url: String,
}

impl ResourceClient {
    fn build(
        kind: ResourceKind,
        settings: &ClusterSettings,
        credentials: &ClusterCredentials,
    ) -> Result<Self, BootstrapError> {
        let fail = |detail: String| BootstrapError::orchestration(kind.client, detail);

        validate_namespace(&settings.namespace).map_err(fail)?;

        let mut builder = reqwest::Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout);

        if let Some(pem) = &credentials.ca_pem {
            let cert = reqwest::Certificate::from_pem(pem)
                .map_err(|e| fail(format!("invalid cluster CA certificate: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        if let Some(token) = &credentials.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| fail("service account token is not a valid header value".into()))?;
            value.set_sensitive(true);
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let http = builder.build().map_err(|e| fail(e.to_string()))?;
        let collection_url = format!(
            "{}/apis/{}/{}/namespaces/{}/{}",
            settings.api_base(),
            kind.group,
            kind.version,
            settings.namespace,
            kind.plural
        );

        debug!(client = kind.client, url = %collection_url, "orchestration=client ready");
        Ok(Self {
            http,
            namespace: settings.namespace.clone(),
            collection_url,
        })
    }

    fn item_url(&self, name: &str) -> String {
        format!("{}/{}", self.collection_url, name)
    }
}

/// Client for workflow resources in one namespace.
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    inner: ResourceClient,
}

impl WorkflowClient {
    pub fn new(
        settings: &ClusterSettings,
        credentials: &ClusterCredentials,
    ) -> Result<Self, BootstrapError> {
        ResourceClient::build(WORKFLOWS, settings, credentials).map(|inner| Self { inner })
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn collection_url(&self) -> &str {
        &self.inner.collection_url
    }

    pub fn workflow_url(&self, name: &str) -> String {
        self.inner.item_url(name)
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }
}

/// Client for scheduled-workflow resources in one namespace.
#[derive(Debug, Clone)]
pub struct ScheduledWorkflowClient {
    inner: ResourceClient,
}

impl ScheduledWorkflowClient {
    pub fn new(
        settings: &ClusterSettings,
        credentials: &ClusterCredentials,
    ) -> Result<Self, BootstrapError> {
        ResourceClient::build(SCHEDULED_WORKFLOWS, settings, credentials)
            .map(|inner| Self { inner })
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn collection_url(&self) -> &str {
        &self.inner.collection_url
    }

    pub fn scheduled_workflow_url(&self, name: &str) -> String {
        self.inner.item_url(name)
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }
}
