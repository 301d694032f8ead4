//! Infrastructure layer: composition of the ready client manager and
//! process lifecycle.

pub mod shutdown;
pub mod state;
