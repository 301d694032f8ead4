use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{run_details, run_metrics};
use crate::util::Clock;

/// Storage state of a run that has been archived by the user.
pub const STORAGE_STATE_ARCHIVED: &str = "STORAGESTATE_ARCHIVED";

#[derive(Clone)]
pub struct RunStore {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl RunStore {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn get_run(&self, uuid: &str) -> Result<Option<run_details::Model>, DbErr> {
        run_details::Entity::find_by_id(uuid.to_string())
            .one(&self.db)
            .await
    }

    /// Records a metric for an existing run. The run must exist; the database
    /// rejects metrics for unknown runs.
    pub async fn report_metric(
        &self,
        run_uuid: &str,
        node_id: &str,
        name: &str,
        value: f64,
        format: &str,
    ) -> Result<run_metrics::Model, DbErr> {
        run_metrics::ActiveModel {
            run_uuid: Set(run_uuid.to_string()),
            node_id: Set(node_id.to_string()),
            name: Set(name.to_string()),
            number_value: Set(value),
            format: Set(format.to_string()),
            payload: Set(None),
        }
        .insert(&self.db)
        .await
    }

    pub async fn list_metrics(&self, run_uuid: &str) -> Result<Vec<run_metrics::Model>, DbErr> {
        run_metrics::Entity::find()
            .filter(run_metrics::Column::RunUuid.eq(run_uuid))
            .order_by_asc(run_metrics::Column::NodeId)
            .order_by_asc(run_metrics::Column::Name)
            .all(&self.db)
            .await
    }

    /// Marks a run archived and stamps its finish time if it never finished.
    pub async fn archive_run(&self, uuid: &str) -> Result<Option<run_details::Model>, DbErr> {
        let Some(run) = self.get_run(uuid).await? else {
            return Ok(None);
        };

        let finished = run.finished_at_in_sec;
        let mut active: run_details::ActiveModel = run.into();
        active.storage_state = Set(STORAGE_STATE_ARCHIVED.to_string());
        if finished == 0 {
            active.finished_at_in_sec = Set(self.clock.now_unix_seconds());
        }
        active.update(&self.db).await.map(Some)
    }
}
