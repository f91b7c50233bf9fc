//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::MarketplaceConfig;
use crate::infra::Database;
use crate::service::{
    CatalogService, CategoryService, ClientService, IdentityVerifier, ProviderService,
    ServiceContainer, Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Category aggregation
    pub categories: Arc<dyn CategoryService>,
    /// Service lifecycle
    pub catalog: Arc<dyn CatalogService>,
    /// Provider bookkeeping
    pub providers: Arc<dyn ProviderService>,
    /// Client bookkeeping
    pub clients: Arc<dyn ClientService>,
    /// Bearer token verification
    pub identity: Arc<dyn IdentityVerifier>,
    /// Database handle for health checks
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire every service over the given database.
    pub fn from_config(database: Arc<Database>, config: &MarketplaceConfig) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database)
    }

    /// Take services from an existing container.
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            categories: container.categories(),
            catalog: container.catalog(),
            providers: container.providers(),
            clients: container.clients(),
            identity: container.identity(),
            database,
        }
    }
}
