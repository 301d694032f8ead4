use std::sync::Arc;

use db_infra::{BackoffPolicy, DbConnector, SeaOrmConnector};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::bootstrap::{bootstrap_db, provision_bucket};
use crate::config::{BootstrapSettings, ConfigResolver};
use crate::error::BootstrapError;
use crate::orchestration::{ClusterCredentials, ScheduledWorkflowClient, WorkflowClient};
use crate::state::client_manager::{ClientManager, Stores};
use crate::storage::{BucketApi, ObjectStore, S3BucketApi};
use crate::util::{Clock, IdGenerator, SystemClock, UuidGenerator};

/// Builder for the [`ClientManager`] (used by main and tests).
///
/// Every override is optional; production leaves them unset.
#[derive(Default)]
pub struct ManagerBuilder {
    connector: Option<Arc<dyn DbConnector>>,
    bucket_api: Option<Arc<dyn BucketApi>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    backoff: Option<BackoffPolicy>,
    credentials: Option<ClusterCredentials>,
}

impl ManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connector(mut self, connector: Arc<dyn DbConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn with_bucket_api(mut self, api: Arc<dyn BucketApi>) -> Self {
        self.bucket_api = Some(api);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Replaces the default policy, whose budget is `InitConnectionTimeout`.
    pub fn with_backoff(mut self, policy: BackoffPolicy) -> Self {
        self.backoff = Some(policy);
        self
    }

    pub fn with_cluster_credentials(mut self, credentials: ClusterCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Resolves configuration, then brings up every dependency in order.
    ///
    /// Either a fully usable manager is returned or nothing is: when a step
    /// after the database connection fails, the connection is closed first.
    pub async fn build(self, config: &dyn ConfigResolver) -> Result<ClientManager, BootstrapError> {
        let settings = BootstrapSettings::resolve(config)?;
        let policy = self
            .backoff
            .unwrap_or_else(|| BackoffPolicy::with_max_elapsed(settings.init_connection_timeout));
        let connector = self
            .connector
            .clone()
            .unwrap_or_else(|| Arc::new(SeaOrmConnector));

        info!(
            target_db = ?settings.db,
            bucket = %settings.object_store.bucket,
            namespace = %settings.cluster.namespace,
            budget_ms = policy.max_elapsed.as_millis() as u64,
            "bootstrap=start"
        );

        let db = bootstrap_db(connector.as_ref(), &settings.db, &policy).await?;

        match self.assemble(&db, &settings).await {
            Ok(parts) => {
                info!("bootstrap=done");
                Ok(parts.into_manager(db))
            }
            Err(e) => {
                if let Err(close_err) = db.close().await {
                    warn!(error = %close_err, "failed to close database after bootstrap error");
                }
                Err(e)
            }
        }
    }

    async fn assemble(
        self,
        db: &DatabaseConnection,
        settings: &BootstrapSettings,
    ) -> Result<Parts, BootstrapError> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self.ids.unwrap_or_else(|| Arc::new(UuidGenerator));
        let stores = Stores::bind(db, &clock, &ids);

        let bucket_api: Arc<dyn BucketApi> = match self.bucket_api {
            Some(api) => api,
            None => Arc::new(S3BucketApi::connect(&settings.object_store).await?),
        };
        let provisioning = provision_bucket(bucket_api.as_ref(), &settings.object_store.bucket).await?;
        info!(bucket = %settings.object_store.bucket, outcome = ?provisioning, "object store ready");
        let object_store = ObjectStore::new(bucket_api, settings.object_store.bucket.clone());

        let credentials = match self.credentials {
            Some(credentials) => credentials,
            None => ClusterCredentials::load(&settings.cluster.service_account_dir).await?,
        };
        let workflow = WorkflowClient::new(&settings.cluster, &credentials)?;
        let scheduled_workflow = ScheduledWorkflowClient::new(&settings.cluster, &credentials)?;

        Ok(Parts {
            stores,
            object_store,
            workflow,
            scheduled_workflow,
            clock,
            ids,
        })
    }
}

struct Parts {
    stores: Stores,
    object_store: ObjectStore,
    workflow: WorkflowClient,
    scheduled_workflow: ScheduledWorkflowClient,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Parts {
    fn into_manager(self, db: DatabaseConnection) -> ClientManager {
        ClientManager::new(
            db,
            self.stores,
            self.object_store,
            self.workflow,
            self.scheduled_workflow,
            self.clock,
            self.ids,
        )
    }
}

pub fn build_manager() -> ManagerBuilder {
    ManagerBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::error::FailureKind;

    #[tokio::test]
    async fn test_build_fails_fast_on_missing_timeout() {
        let err = build_manager().build(&MapConfig::new()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Config);
        assert!(err.to_string().contains("InitConnectionTimeout"), "{err}");
    }
}
