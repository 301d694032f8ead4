use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "run_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "UUID")]
    pub uuid: String,
    #[sea_orm(column_name = "DisplayName")]
    pub display_name: String,
    #[sea_orm(column_name = "Name")]
    pub name: String,
    #[sea_orm(column_name = "StorageState")]
    pub storage_state: String,
    #[sea_orm(column_name = "Namespace")]
    pub namespace: String,
    #[sea_orm(column_name = "Description")]
    pub description: String,
    #[sea_orm(column_name = "CreatedAtInSec")]
    pub created_at_in_sec: i64,
    #[sea_orm(column_name = "ScheduledAtInSec")]
    pub scheduled_at_in_sec: i64,
    #[sea_orm(column_name = "FinishedAtInSec")]
    pub finished_at_in_sec: i64,
    #[sea_orm(column_name = "Conditions")]
    pub conditions: String,
    #[sea_orm(column_name = "PipelineId")]
    pub pipeline_id: String,
    #[sea_orm(column_name = "PipelineName")]
    pub pipeline_name: String,
    #[sea_orm(column_name = "PipelineSpecManifest", column_type = "Text", nullable)]
    pub pipeline_spec_manifest: Option<String>,
    #[sea_orm(column_name = "WorkflowSpecManifest", column_type = "Text", nullable)]
    pub workflow_spec_manifest: Option<String>,
    #[sea_orm(column_name = "Parameters", column_type = "Text", nullable)]
    pub parameters: Option<String>,
    #[sea_orm(column_name = "PipelineRuntimeManifest", column_type = "Text", nullable)]
    pub pipeline_runtime_manifest: Option<String>,
    #[sea_orm(column_name = "WorkflowRuntimeManifest", column_type = "Text", nullable)]
    pub workflow_runtime_manifest: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::run_metrics::Entity")]
    RunMetrics,
}

impl Related<super::run_metrics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RunMetrics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
