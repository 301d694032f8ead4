//! Entity shapes of the persisted tables. Column names match the DDL in the
//! `schema` crate.

pub mod experiments;
pub mod jobs;
pub mod pipelines;
pub mod resource_references;
pub mod run_details;
pub mod run_metrics;
