#![allow(dead_code)]

pub mod buckets;
pub mod config;
pub mod connectors;

pub use buckets::FakeBuckets;
pub use config::{sqlite_config, BUCKET, NAMESPACE};
pub use connectors::OutageConnector;
