//! Startup steps that prepare external dependencies before they are handed out.

pub mod db;
pub mod object_store;

pub use db::bootstrap_db;
pub use object_store::{provision_bucket, BucketProvisioning};
