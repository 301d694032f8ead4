use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use crate::entities::experiments;
use crate::util::{Clock, IdGenerator};

#[derive(Clone)]
pub struct ExperimentStore {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl ExperimentStore {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { db, clock, ids }
    }

    pub async fn create_experiment(
        &self,
        name: &str,
        description: &str,
    ) -> Result<experiments::Model, DbErr> {
        experiments::ActiveModel {
            uuid: Set(self.ids.new_id().to_string()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            created_at_in_sec: Set(self.clock.now_unix_seconds()),
        }
        .insert(&self.db)
        .await
    }
}
