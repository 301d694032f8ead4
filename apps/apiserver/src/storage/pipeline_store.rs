use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use crate::entities::pipelines;
use crate::util::{Clock, IdGenerator};

/// Status of a pipeline whose upload has completed.
pub const STATUS_READY: &str = "READY";

#[derive(Clone)]
pub struct PipelineStore {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl PipelineStore {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { db, clock, ids }
    }

    pub async fn create_pipeline(
        &self,
        name: &str,
        description: &str,
        parameters: Option<String>,
    ) -> Result<pipelines::Model, DbErr> {
        pipelines::ActiveModel {
            uuid: Set(self.ids.new_id().to_string()),
            created_at_in_sec: Set(self.clock.now_unix_seconds()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            parameters: Set(parameters),
            status: Set(STATUS_READY.to_string()),
        }
        .insert(&self.db)
        .await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<pipelines::Model>, DbErr> {
        pipelines::Entity::find()
            .filter(pipelines::Column::Name.eq(name))
            .one(&self.db)
            .await
    }
}
