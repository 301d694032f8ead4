use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pipelines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "UUID")]
    pub uuid: String,
    #[sea_orm(column_name = "CreatedAtInSec")]
    pub created_at_in_sec: i64,
    #[sea_orm(column_name = "Name", unique)]
    pub name: String,
    #[sea_orm(column_name = "Description")]
    pub description: String,
    #[sea_orm(column_name = "Parameters", column_type = "Text", nullable)]
    pub parameters: Option<String>,
    #[sea_orm(column_name = "Status")]
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
