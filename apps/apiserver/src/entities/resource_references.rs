use sea_orm::entity::prelude::*;

/// Edge between two resources, e.g. a run owned by an experiment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "resource_references")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "ResourceUUID")]
    pub resource_uuid: String,
    #[sea_orm(primary_key, auto_increment = false, column_name = "ResourceType")]
    pub resource_type: String,
    #[sea_orm(column_name = "ReferenceUUID")]
    pub reference_uuid: String,
    #[sea_orm(column_name = "ReferenceName")]
    pub reference_name: String,
    #[sea_orm(primary_key, auto_increment = false, column_name = "ReferenceType")]
    pub reference_type: String,
    #[sea_orm(column_name = "Relationship")]
    pub relationship: String,
    #[sea_orm(column_name = "Payload", column_type = "Text", nullable)]
    pub payload: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
