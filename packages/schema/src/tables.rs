use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

use crate::constraints::run_metric_foreign_key;

/// Tables in materialization order. Referenced tables come first.
pub const TABLES: [&str; 6] = [
    "experiments",
    "jobs",
    "pipelines",
    "resource_references",
    "run_details",
    "run_metrics",
];

// ----- Iden enums for tables & columns -----
// Column names are persisted in PascalCase and shared with the store layer.

#[derive(Iden)]
pub enum Experiments {
    Table,
    #[iden = "UUID"]
    Uuid,
    #[iden = "Name"]
    Name,
    #[iden = "Description"]
    Description,
    #[iden = "CreatedAtInSec"]
    CreatedAtInSec,
}

#[derive(Iden)]
pub enum Jobs {
    Table,
    #[iden = "UUID"]
    Uuid,
    #[iden = "DisplayName"]
    DisplayName,
    #[iden = "Name"]
    Name,
    #[iden = "Namespace"]
    Namespace,
    #[iden = "Description"]
    Description,
    #[iden = "MaxConcurrency"]
    MaxConcurrency,
    #[iden = "CreatedAtInSec"]
    CreatedAtInSec,
    #[iden = "UpdatedAtInSec"]
    UpdatedAtInSec,
    #[iden = "Enabled"]
    Enabled,
    #[iden = "CronScheduleStartTimeInSec"]
    CronScheduleStartTimeInSec,
    #[iden = "CronScheduleEndTimeInSec"]
    CronScheduleEndTimeInSec,
    #[iden = "Schedule"]
    Schedule,
    #[iden = "PeriodicScheduleStartTimeInSec"]
    PeriodicScheduleStartTimeInSec,
    #[iden = "PeriodicScheduleEndTimeInSec"]
    PeriodicScheduleEndTimeInSec,
    #[iden = "IntervalSecond"]
    IntervalSecond,
    #[iden = "PipelineId"]
    PipelineId,
    #[iden = "PipelineName"]
    PipelineName,
    #[iden = "PipelineSpecManifest"]
    PipelineSpecManifest,
    #[iden = "WorkflowSpecManifest"]
    WorkflowSpecManifest,
    #[iden = "Parameters"]
    Parameters,
    #[iden = "Conditions"]
    Conditions,
}

#[derive(Iden)]
pub enum Pipelines {
    Table,
    #[iden = "UUID"]
    Uuid,
    #[iden = "CreatedAtInSec"]
    CreatedAtInSec,
    #[iden = "Name"]
    Name,
    #[iden = "Description"]
    Description,
    #[iden = "Parameters"]
    Parameters,
    #[iden = "Status"]
    Status,
}

#[derive(Iden)]
pub enum ResourceReferences {
    Table,
    #[iden = "ResourceUUID"]
    ResourceUuid,
    #[iden = "ResourceType"]
    ResourceType,
    #[iden = "ReferenceUUID"]
    ReferenceUuid,
    #[iden = "ReferenceName"]
    ReferenceName,
    #[iden = "ReferenceType"]
    ReferenceType,
    #[iden = "Relationship"]
    Relationship,
    #[iden = "Payload"]
    Payload,
}

#[derive(Iden)]
pub enum RunDetails {
    Table,
    #[iden = "UUID"]
    Uuid,
    #[iden = "DisplayName"]
    DisplayName,
    #[iden = "Name"]
    Name,
    #[iden = "StorageState"]
    StorageState,
    #[iden = "Namespace"]
    Namespace,
    #[iden = "Description"]
    Description,
    #[iden = "CreatedAtInSec"]
    CreatedAtInSec,
    #[iden = "ScheduledAtInSec"]
    ScheduledAtInSec,
    #[iden = "FinishedAtInSec"]
    FinishedAtInSec,
    #[iden = "Conditions"]
    Conditions,
    #[iden = "PipelineId"]
    PipelineId,
    #[iden = "PipelineName"]
    PipelineName,
    #[iden = "PipelineSpecManifest"]
    PipelineSpecManifest,
    #[iden = "WorkflowSpecManifest"]
    WorkflowSpecManifest,
    #[iden = "Parameters"]
    Parameters,
    #[iden = "PipelineRuntimeManifest"]
    PipelineRuntimeManifest,
    #[iden = "WorkflowRuntimeManifest"]
    WorkflowRuntimeManifest,
}

#[derive(Iden)]
pub enum RunMetrics {
    Table,
    #[iden = "RunUUID"]
    RunUuid,
    #[iden = "NodeID"]
    NodeId,
    #[iden = "Name"]
    Name,
    #[iden = "NumberValue"]
    NumberValue,
    #[iden = "Format"]
    Format,
    #[iden = "Payload"]
    Payload,
}

// ----- column helpers -----

fn key<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).string().not_null().to_owned()
}

fn label<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).string().not_null().default("").to_owned()
}

fn seconds<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().default(0).to_owned()
}

fn optional_seconds<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).big_integer().null().to_owned()
}

// Manifests and payloads exceed varchar limits on MySQL.
fn document<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).text().null().to_owned()
}

/// `CREATE TABLE IF NOT EXISTS` statements in [`TABLES`] order.
///
/// SQLite cannot add foreign keys to existing tables, so there the run-metric
/// constraint is declared inline on `run_metrics`.
pub(crate) fn create_statements(
    backend: DatabaseBackend,
) -> Vec<(&'static str, TableCreateStatement)> {
    let mut run_metrics = run_metrics_table();
    if backend == DatabaseBackend::Sqlite {
        run_metrics.foreign_key(&mut run_metric_foreign_key());
    }

    vec![
        (TABLES[0], experiments_table()),
        (TABLES[1], jobs_table()),
        (TABLES[2], pipelines_table()),
        (TABLES[3], resource_references_table()),
        (TABLES[4], run_details_table()),
        (TABLES[5], run_metrics),
    ]
}

fn experiments_table() -> TableCreateStatement {
    Table::create()
        .table(Experiments::Table)
        .if_not_exists()
        .col(&mut key(Experiments::Uuid).primary_key().to_owned())
        .col(&mut key(Experiments::Name).unique_key().to_owned())
        .col(&mut label(Experiments::Description))
        .col(&mut seconds(Experiments::CreatedAtInSec))
        .to_owned()
}

fn jobs_table() -> TableCreateStatement {
    Table::create()
        .table(Jobs::Table)
        .if_not_exists()
        .col(&mut key(Jobs::Uuid).primary_key().to_owned())
        .col(&mut label(Jobs::DisplayName))
        .col(&mut label(Jobs::Name))
        .col(&mut label(Jobs::Namespace))
        .col(&mut label(Jobs::Description))
        .col(&mut seconds(Jobs::MaxConcurrency))
        .col(&mut seconds(Jobs::CreatedAtInSec))
        .col(&mut seconds(Jobs::UpdatedAtInSec))
        .col(
            ColumnDef::new(Jobs::Enabled)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(&mut optional_seconds(Jobs::CronScheduleStartTimeInSec))
        .col(&mut optional_seconds(Jobs::CronScheduleEndTimeInSec))
        .col(ColumnDef::new(Jobs::Schedule).string().null())
        .col(&mut optional_seconds(Jobs::PeriodicScheduleStartTimeInSec))
        .col(&mut optional_seconds(Jobs::PeriodicScheduleEndTimeInSec))
        .col(&mut optional_seconds(Jobs::IntervalSecond))
        .col(&mut label(Jobs::PipelineId))
        .col(&mut label(Jobs::PipelineName))
        .col(&mut document(Jobs::PipelineSpecManifest))
        .col(&mut document(Jobs::WorkflowSpecManifest))
        .col(&mut document(Jobs::Parameters))
        .col(&mut label(Jobs::Conditions))
        .to_owned()
}

fn pipelines_table() -> TableCreateStatement {
    Table::create()
        .table(Pipelines::Table)
        .if_not_exists()
        .col(&mut key(Pipelines::Uuid).primary_key().to_owned())
        .col(&mut seconds(Pipelines::CreatedAtInSec))
        .col(&mut key(Pipelines::Name).unique_key().to_owned())
        .col(&mut label(Pipelines::Description))
        .col(&mut document(Pipelines::Parameters))
        .col(&mut label(Pipelines::Status))
        .to_owned()
}

fn resource_references_table() -> TableCreateStatement {
    Table::create()
        .table(ResourceReferences::Table)
        .if_not_exists()
        .col(&mut key(ResourceReferences::ResourceUuid))
        .col(&mut key(ResourceReferences::ResourceType))
        .col(&mut label(ResourceReferences::ReferenceUuid))
        .col(&mut label(ResourceReferences::ReferenceName))
        .col(&mut key(ResourceReferences::ReferenceType))
        .col(&mut label(ResourceReferences::Relationship))
        .col(&mut document(ResourceReferences::Payload))
        .primary_key(
            Index::create()
                .col(ResourceReferences::ResourceUuid)
                .col(ResourceReferences::ResourceType)
                .col(ResourceReferences::ReferenceType),
        )
        .to_owned()
}

fn run_details_table() -> TableCreateStatement {
    Table::create()
        .table(RunDetails::Table)
        .if_not_exists()
        .col(&mut key(RunDetails::Uuid).primary_key().to_owned())
        .col(&mut label(RunDetails::DisplayName))
        .col(&mut label(RunDetails::Name))
        .col(&mut label(RunDetails::StorageState))
        .col(&mut label(RunDetails::Namespace))
        .col(&mut label(RunDetails::Description))
        .col(&mut seconds(RunDetails::CreatedAtInSec))
        .col(&mut seconds(RunDetails::ScheduledAtInSec))
        .col(&mut seconds(RunDetails::FinishedAtInSec))
        .col(&mut label(RunDetails::Conditions))
        .col(&mut label(RunDetails::PipelineId))
        .col(&mut label(RunDetails::PipelineName))
        .col(&mut document(RunDetails::PipelineSpecManifest))
        .col(&mut document(RunDetails::WorkflowSpecManifest))
        .col(&mut document(RunDetails::Parameters))
        .col(&mut document(RunDetails::PipelineRuntimeManifest))
        .col(&mut document(RunDetails::WorkflowRuntimeManifest))
        .to_owned()
}

fn run_metrics_table() -> TableCreateStatement {
    Table::create()
        .table(RunMetrics::Table)
        .if_not_exists()
        .col(&mut key(RunMetrics::RunUuid))
        .col(&mut key(RunMetrics::NodeId))
        .col(&mut key(RunMetrics::Name))
        .col(
            ColumnDef::new(RunMetrics::NumberValue)
                .double()
                .not_null()
                .default(0.0),
        )
        .col(&mut label(RunMetrics::Format))
        .col(&mut document(RunMetrics::Payload))
        .primary_key(
            Index::create()
                .col(RunMetrics::RunUuid)
                .col(RunMetrics::NodeId)
                .col(RunMetrics::Name),
        )
        .to_owned()
}
