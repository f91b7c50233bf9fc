//! Storage handle shared by every engine component.
//!
//! `Persistence` is built once from a `DatabaseConnection` and injected into
//! the managers; it owns one repository per aggregate. Engine calls issue
//! single-row writes, so no transaction API is exposed here.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repository::{
    CategoryRepository, CategoryStore, ClientRepository, ClientStore, ProviderRepository,
    ProviderStore, ServiceRepository, ServiceStore,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Centralized repository access for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait UnitOfWork: Send + Sync {
    /// Get category repository
    fn categories(&self) -> Arc<dyn CategoryRepository>;

    /// Get service repository
    fn services(&self) -> Arc<dyn ServiceRepository>;

    /// Get provider repository
    fn providers(&self) -> Arc<dyn ProviderRepository>;

    /// Get client repository
    fn clients(&self) -> Arc<dyn ClientRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    category_repo: Arc<CategoryStore>,
    service_repo: Arc<ServiceStore>,
    provider_repo: Arc<ProviderStore>,
    client_repo: Arc<ClientStore>,
}

impl Persistence {
    /// Create the storage handle over an open connection pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            category_repo: Arc::new(CategoryStore::new(db.clone())),
            service_repo: Arc::new(ServiceStore::new(db.clone())),
            provider_repo: Arc::new(ProviderStore::new(db.clone())),
            client_repo: Arc::new(ClientStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn services(&self) -> Arc<dyn ServiceRepository> {
        self.service_repo.clone()
    }

    fn providers(&self) -> Arc<dyn ProviderRepository> {
        self.provider_repo.clone()
    }

    fn clients(&self) -> Arc<dyn ClientRepository> {
        self.client_repo.clone()
    }
}
