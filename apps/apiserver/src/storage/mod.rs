//! Store facades handed out by the client manager.
//!
//! Each store is bound to the shared connection established at startup;
//! stores that stamp new rows also carry the clock and id generator.

pub mod experiment_store;
pub mod job_store;
pub mod object_store;
pub mod pipeline_store;
pub mod resource_reference_store;
pub mod run_store;

pub use experiment_store::ExperimentStore;
pub use job_store::JobStore;
pub use object_store::{BucketApi, ObjectStore, ObjectStoreError, S3BucketApi};
pub use pipeline_store::PipelineStore;
pub use resource_reference_store::ResourceReferenceStore;
pub use run_store::RunStore;
