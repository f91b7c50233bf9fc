//! Commands module - CLI command implementations.

pub mod migrate;
pub mod reconcile;
pub mod serve;
