//! Repository layer for data access.

pub mod entities;
mod category_repository;
mod client_repository;
mod provider_repository;
mod service_repository;

pub use category_repository::{CategoryRepository, CategoryStore};
pub use client_repository::{ClientRepository, ClientStore};
pub use provider_repository::{ProviderRepository, ProviderStore};
pub use service_repository::{ServiceRepository, ServiceStore};

#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use client_repository::MockClientRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use provider_repository::MockProviderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use service_repository::MockServiceRepository;

use sea_orm::{DbErr, SqlErr};

/// True when the statement hit a unique index.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
