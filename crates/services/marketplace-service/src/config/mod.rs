//! Configuration module
//!
//! Handles application configuration and constants.

pub mod constants;
mod settings;

pub use constants::*;
pub use settings::{ConfigError, IndexSyncConfig, MarketplaceConfig};
