//! Application services layer - Use cases and business logic.
//!
//! Managers are generic over the `UnitOfWork` so tests can drive them with
//! mocked repositories. The service lifecycle talks to category aggregation
//! only through `CategoryIndexSync`.

mod catalog_service;
mod category_service;
mod client_service;
pub mod container;
mod identity;
mod index_sync;
mod provider_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use catalog_service::{CatalogManager, CatalogService};
pub use category_service::{CategoryManager, CategoryService};
pub use client_service::{ClientManager, ClientService};
pub use identity::{Claims, Identity, IdentityVerifier, JwtVerifier};
pub use index_sync::CategoryIndexSync;
pub use provider_service::{ProviderManager, ProviderService};

#[cfg(any(test, feature = "test-utils"))]
pub use category_service::MockCategoryService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::infra::MockUnitOfWork;
    use crate::repository::{
        CategoryRepository, ClientRepository, MockCategoryRepository, MockClientRepository,
        MockProviderRepository, MockServiceRepository, ProviderRepository, ServiceRepository,
    };

    fn wire(
        categories: MockCategoryRepository,
        services: MockServiceRepository,
        providers: MockProviderRepository,
        clients: MockClientRepository,
    ) -> Arc<MockUnitOfWork> {
        let categories: Arc<dyn CategoryRepository> = Arc::new(categories);
        let services: Arc<dyn ServiceRepository> = Arc::new(services);
        let providers: Arc<dyn ProviderRepository> = Arc::new(providers);
        let clients: Arc<dyn ClientRepository> = Arc::new(clients);

        let mut uow = MockUnitOfWork::new();
        uow.expect_categories().returning(move || categories.clone());
        uow.expect_services().returning(move || services.clone());
        uow.expect_providers().returning(move || providers.clone());
        uow.expect_clients().returning(move || clients.clone());
        Arc::new(uow)
    }

    /// Unit of work for catalog-side tests
    pub fn uow_with(
        categories: MockCategoryRepository,
        services: MockServiceRepository,
        providers: MockProviderRepository,
    ) -> Arc<MockUnitOfWork> {
        wire(categories, services, providers, MockClientRepository::new())
    }

    /// Unit of work for provider/client tests
    pub fn people_uow(
        services: MockServiceRepository,
        providers: MockProviderRepository,
        clients: MockClientRepository,
    ) -> Arc<MockUnitOfWork> {
        wire(MockCategoryRepository::new(), services, providers, clients)
    }
}
