//! CLI module - Command-line interface for the marketplace.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `reconcile` - Rebuild category service indexes

pub mod args;

pub use args::{Cli, Commands};
