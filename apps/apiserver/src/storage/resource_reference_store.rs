use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::entities::resource_references;

#[derive(Clone)]
pub struct ResourceReferenceStore {
    db: DatabaseConnection,
}

impl ResourceReferenceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// References held by one resource, e.g. the experiment a run belongs to.
    pub async fn references_of(
        &self,
        resource_uuid: &str,
        resource_type: &str,
    ) -> Result<Vec<resource_references::Model>, DbErr> {
        resource_references::Entity::find()
            .filter(resource_references::Column::ResourceUuid.eq(resource_uuid))
            .filter(resource_references::Column::ResourceType.eq(resource_type))
            .all(&self.db)
            .await
    }
}
