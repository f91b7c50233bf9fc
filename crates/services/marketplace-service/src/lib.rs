//! Marketplace service - categories, services, providers and clients.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **infra**: Database connection, migrations and the storage handle
//! - **repository**: SeaORM entities and repository traits
//! - **service**: Use cases (category aggregation, service lifecycle, people)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//!
//! # CLI Usage
//!
//! ```bash
//! marketplace serve --port 3000
//! marketplace migrate up
//! marketplace reconcile
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::MarketplaceConfig;
pub use infra::Database;
