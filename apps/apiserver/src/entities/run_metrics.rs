use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "run_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "RunUUID")]
    pub run_uuid: String,
    #[sea_orm(primary_key, auto_increment = false, column_name = "NodeID")]
    pub node_id: String,
    #[sea_orm(primary_key, auto_increment = false, column_name = "Name")]
    pub name: String,
    #[sea_orm(column_name = "NumberValue")]
    pub number_value: f64,
    #[sea_orm(column_name = "Format")]
    pub format: String,
    #[sea_orm(column_name = "Payload", column_type = "Text", nullable)]
    pub payload: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::run_details::Entity",
        from = "Column::RunUuid",
        to = "super::run_details::Column::Uuid",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    RunDetails,
}

impl Related<super::run_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RunDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
