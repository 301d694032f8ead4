use sea_orm::entity::prelude::*;

/// A recurring run definition. Schedule columns are null for whichever
/// trigger kind (cron or periodic) the job does not use.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "UUID")]
    pub uuid: String,
    #[sea_orm(column_name = "DisplayName")]
    pub display_name: String,
    #[sea_orm(column_name = "Name")]
    pub name: String,
    #[sea_orm(column_name = "Namespace")]
    pub namespace: String,
    #[sea_orm(column_name = "Description")]
    pub description: String,
    #[sea_orm(column_name = "MaxConcurrency")]
    pub max_concurrency: i64,
    #[sea_orm(column_name = "CreatedAtInSec")]
    pub created_at_in_sec: i64,
    #[sea_orm(column_name = "UpdatedAtInSec")]
    pub updated_at_in_sec: i64,
    #[sea_orm(column_name = "Enabled")]
    pub enabled: bool,
    #[sea_orm(column_name = "CronScheduleStartTimeInSec")]
    pub cron_schedule_start_time_in_sec: Option<i64>,
    #[sea_orm(column_name = "CronScheduleEndTimeInSec")]
    pub cron_schedule_end_time_in_sec: Option<i64>,
    #[sea_orm(column_name = "Schedule")]
    pub schedule: Option<String>,
    #[sea_orm(column_name = "PeriodicScheduleStartTimeInSec")]
    pub periodic_schedule_start_time_in_sec: Option<i64>,
    #[sea_orm(column_name = "PeriodicScheduleEndTimeInSec")]
    pub periodic_schedule_end_time_in_sec: Option<i64>,
    #[sea_orm(column_name = "IntervalSecond")]
    pub interval_second: Option<i64>,
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
    #[sea_orm(column_name = "Conditions")]
    pub conditions: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
