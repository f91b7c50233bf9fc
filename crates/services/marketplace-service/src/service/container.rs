//! Service container - Centralized access to the marketplace services.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    CatalogManager, CatalogService, CategoryIndexSync, CategoryManager, CategoryService,
    ClientManager, ClientService, IdentityVerifier, JwtVerifier, ProviderManager, ProviderService,
};
use crate::config::MarketplaceConfig;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Category aggregation and index maintenance
    fn categories(&self) -> Arc<dyn CategoryService>;

    /// Service lifecycle and queries
    fn catalog(&self) -> Arc<dyn CatalogService>;

    /// Provider bookkeeping
    fn providers(&self) -> Arc<dyn ProviderService>;

    /// Client bookkeeping
    fn clients(&self) -> Arc<dyn ClientService>;

    /// Bearer token verification
    fn identity(&self) -> Arc<dyn IdentityVerifier>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    category_service: Arc<dyn CategoryService>,
    catalog_service: Arc<dyn CatalogService>,
    provider_service: Arc<dyn ProviderService>,
    client_service: Arc<dyn ClientService>,
    identity_verifier: Arc<dyn IdentityVerifier>,
}

impl Services {
    /// Create a new service container from already built services
    pub fn new(
        category_service: Arc<dyn CategoryService>,
        catalog_service: Arc<dyn CatalogService>,
        provider_service: Arc<dyn ProviderService>,
        client_service: Arc<dyn ClientService>,
        identity_verifier: Arc<dyn IdentityVerifier>,
    ) -> Self {
        Self {
            category_service,
            catalog_service,
            provider_service,
            client_service,
            identity_verifier,
        }
    }

    /// Wire every service over one connection pool
    pub fn from_connection(db: DatabaseConnection, config: &MarketplaceConfig) -> Self {
        let uow = Arc::new(Persistence::new(db));

        let category_service: Arc<dyn CategoryService> =
            Arc::new(CategoryManager::new(uow.clone()));
        let index = CategoryIndexSync::new(category_service.clone(), config.index_sync);

        Self {
            catalog_service: Arc::new(CatalogManager::new(uow.clone(), index)),
            provider_service: Arc::new(ProviderManager::new(uow.clone())),
            client_service: Arc::new(ClientManager::new(uow)),
            identity_verifier: Arc::new(JwtVerifier::new(&config.jwt)),
            category_service,
        }
    }
}

impl ServiceContainer for Services {
    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn providers(&self) -> Arc<dyn ProviderService> {
        self.provider_service.clone()
    }

    fn clients(&self) -> Arc<dyn ClientService> {
        self.client_service.clone()
    }

    fn identity(&self) -> Arc<dyn IdentityVerifier> {
        self.identity_verifier.clone()
    }
}
