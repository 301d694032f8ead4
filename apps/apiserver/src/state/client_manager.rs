use std::fmt;
use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

use crate::error::BootstrapError;
use crate::orchestration::{ScheduledWorkflowClient, WorkflowClient};
use crate::storage::{
    ExperimentStore, JobStore, ObjectStore, PipelineStore, ResourceReferenceStore, RunStore,
};
use crate::util::{Clock, IdGenerator};

/// Store facades bound to one connection.
#[derive(Clone)]
pub(crate) struct Stores {
    pub experiments: ExperimentStore,
    pub pipelines: PipelineStore,
    pub jobs: JobStore,
    pub runs: RunStore,
    pub resource_references: ResourceReferenceStore,
}

impl Stores {
    pub(crate) fn bind(
        db: &DatabaseConnection,
        clock: &Arc<dyn Clock>,
        ids: &Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            experiments: ExperimentStore::new(db.clone(), clock.clone(), ids.clone()),
            pipelines: PipelineStore::new(db.clone(), clock.clone(), ids.clone()),
            jobs: JobStore::new(db.clone()),
            runs: RunStore::new(db.clone(), clock.clone()),
            resource_references: ResourceReferenceStore::new(db.clone()),
        }
    }
}

/// Every handle the API server needs, owned in one place.
///
/// Only [`crate::infra::state::ManagerBuilder`] produces one, and only after
/// every dependency is ready. Accessors borrow; [`ClientManager::close`] is
/// the single teardown.
pub struct ClientManager {
    db: DatabaseConnection,
    stores: Stores,
    object_store: ObjectStore,
    workflow: WorkflowClient,
    scheduled_workflow: ScheduledWorkflowClient,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl ClientManager {
    pub(crate) fn new(
        db: DatabaseConnection,
        stores: Stores,
        object_store: ObjectStore,
        workflow: WorkflowClient,
        scheduled_workflow: ScheduledWorkflowClient,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            db,
            stores,
            object_store,
            workflow,
            scheduled_workflow,
            clock,
            ids,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn experiment_store(&self) -> &ExperimentStore {
        &self.stores.experiments
    }

    pub fn pipeline_store(&self) -> &PipelineStore {
        &self.stores.pipelines
    }

    pub fn job_store(&self) -> &JobStore {
        &self.stores.jobs
    }

    pub fn run_store(&self) -> &RunStore {
        &self.stores.runs
    }

    pub fn resource_reference_store(&self) -> &ResourceReferenceStore {
        &self.stores.resource_references
    }

    pub fn object_store(&self) -> &ObjectStore {
        &self.object_store
    }

    pub fn workflow(&self) -> &WorkflowClient {
        &self.workflow
    }

    pub fn scheduled_workflow(&self) -> &ScheduledWorkflowClient {
        &self.scheduled_workflow
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    /// Releases the database pool. Other handles hold no server-side state.
    pub async fn close(self) -> Result<(), BootstrapError> {
        self.db.close().await.map_err(|e| BootstrapError::Shutdown {
            detail: e.to_string(),
        })?;
        info!("client manager closed");
        Ok(())
    }
}

impl fmt::Debug for ClientManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientManager")
            .field("backend", &self.db.get_database_backend())
            .field("object_store", &self.object_store)
            .field("namespace", &self.workflow.namespace())
            .finish_non_exhaustive()
    }
}
