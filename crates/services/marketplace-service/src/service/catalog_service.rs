//! Service lifecycle: create/update/delete services, listing and search.
//!
//! Every write that changes which category a service belongs to is
//! followed by an explicit category index step through
//! [`CategoryIndexSync`]. That step never fails the write.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::CategoryIndexSync;
use crate::config::MAX_PAGE_SIZE;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use common::{AppError, AppResult};
use domain::service::{
    normalize_locations, normalize_service_description, normalize_tags, normalize_title,
};
use domain::{CreateService, Service, ServiceFilters, UpdateService};

/// Catalog (service lifecycle) trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Create a service under an existing referenced category
    async fn create_service(&self, input: CreateService) -> AppResult<Service>;

    /// Get a service by ID
    async fn get_service(&self, id: Uuid) -> AppResult<Option<Service>>;

    /// Merge a partial update, moving categories when `category_id` changes
    async fn update_service(&self, id: Uuid, input: UpdateService) -> AppResult<Option<Service>>;

    /// Delete a service; false if absent
    async fn delete_service(&self, id: Uuid) -> AppResult<bool>;

    /// Active services of one category
    async fn services_by_category(&self, category_id: Uuid) -> AppResult<Vec<Service>>;

    /// Active popular services, newest first
    async fn popular_services(&self, limit: u64) -> AppResult<Vec<Service>>;

    /// Active services matching a free-text query
    async fn search_services(&self, query: &str) -> AppResult<Vec<Service>>;

    /// Filtered, paginated listing
    async fn list_services(
        &self,
        params: PaginationParams,
        filters: ServiceFilters,
    ) -> AppResult<Paginated<Service>>;

    /// Flip `is_active`
    async fn toggle_active(&self, id: Uuid) -> AppResult<Option<Service>>;

    /// Flip `popular`
    async fn toggle_popular(&self, id: Uuid) -> AppResult<Option<Service>>;
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
    index: CategoryIndexSync,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>, index: CategoryIndexSync) -> Self {
        Self { uow, index }
    }

    /// The target category must exist and own services by reference
    async fn check_category(&self, category_id: Uuid) -> AppResult<()> {
        match self.uow.categories().find_by_id(category_id).await? {
            None => Err(AppError::InvalidCategory(format!(
                "category {} does not exist",
                category_id
            ))),
            Some(category) if !category.accepts_services() => Err(AppError::InvalidCategory(
                format!("category {} holds embedded subcategories", category_id),
            )),
            Some(_) => Ok(()),
        }
    }

    async fn toggle<F>(&self, id: Uuid, flip: F) -> AppResult<Option<Service>>
    where
        F: FnOnce(&mut Service) + Send,
    {
        let Some(mut service) = self.uow.services().find_by_id(id).await? else {
            return Ok(None);
        };

        flip(&mut service);
        service.updated_at = Utc::now();
        self.uow.services().update(service).await.map(Some)
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn create_service(&self, input: CreateService) -> AppResult<Service> {
        let title = normalize_title(&input.title)?;
        let description = normalize_service_description(&input.description)?;
        let pricing = input.pricing.validated()?;
        self.check_category(input.category_id).await?;

        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            title,
            description,
            long_description: input.long_description,
            category_id: input.category_id,
            icon: input.icon,
            pricing,
            locations: normalize_locations(input.locations),
            tags: normalize_tags(input.tags),
            is_active: input.is_active.unwrap_or(true),
            popular: input.popular.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        let service = self.uow.services().create(service).await?;
        tracing::info!(service_id = %service.id, category_id = %service.category_id, "Service created");

        self.index.service_created(service.category_id, service.id).await;
        Ok(service)
    }

    async fn get_service(&self, id: Uuid) -> AppResult<Option<Service>> {
        self.uow.services().find_by_id(id).await
    }

    async fn update_service(&self, id: Uuid, input: UpdateService) -> AppResult<Option<Service>> {
        let Some(mut service) = self.uow.services().find_by_id(id).await? else {
            return Ok(None);
        };
        let previous_category = service.category_id;

        if let Some(title) = input.title.as_deref() {
            service.title = normalize_title(title)?;
        }
        if let Some(description) = input.description.as_deref() {
            service.description = normalize_service_description(description)?;
        }
        if input.long_description.is_some() {
            service.long_description = input.long_description;
        }
        if input.icon.is_some() {
            service.icon = input.icon;
        }
        if let Some(pricing) = input.pricing {
            service.pricing = pricing.validated()?;
        }
        if let Some(locations) = input.locations {
            service.locations = normalize_locations(locations);
        }
        if let Some(tags) = input.tags {
            service.tags = normalize_tags(tags);
        }
        if let Some(active) = input.is_active {
            service.is_active = active;
        }
        if let Some(popular) = input.popular {
            service.popular = popular;
        }
        if let Some(category_id) = input.category_id {
            if category_id != previous_category {
                self.check_category(category_id).await?;
                service.category_id = category_id;
            }
        }
        service.updated_at = Utc::now();

        let service = self.uow.services().update(service).await?;

        if service.category_id != previous_category {
            tracing::info!(
                service_id = %id,
                from = %previous_category,
                to = %service.category_id,
                "Service moved to another category"
            );
            self.index
                .service_moved(previous_category, service.category_id, id)
                .await;
        }

        Ok(Some(service))
    }

    async fn delete_service(&self, id: Uuid) -> AppResult<bool> {
        let Some(service) = self.uow.services().find_by_id(id).await? else {
            return Ok(false);
        };

        let deleted = self.uow.services().delete(id).await?;
        if deleted {
            tracing::info!(service_id = %id, "Service deleted");
            self.index.service_deleted(service.category_id, id).await;
        }
        Ok(deleted)
    }

    async fn services_by_category(&self, category_id: Uuid) -> AppResult<Vec<Service>> {
        self.uow
            .services()
            .list(ServiceFilters {
                category_id: Some(category_id),
                is_active: Some(true),
                ..Default::default()
            })
            .await
    }

    async fn popular_services(&self, limit: u64) -> AppResult<Vec<Service>> {
        self.uow
            .services()
            .find_popular(limit.clamp(1, MAX_PAGE_SIZE))
            .await
    }

    async fn search_services(&self, query: &str) -> AppResult<Vec<Service>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::validation("Search query is required"));
        }

        self.uow
            .services()
            .list(ServiceFilters {
                is_active: Some(true),
                search: Some(query.to_string()),
                ..Default::default()
            })
            .await
    }

    async fn list_services(
        &self,
        params: PaginationParams,
        filters: ServiceFilters,
    ) -> AppResult<Paginated<Service>> {
        let services = self.uow.services().list(filters).await?;
        Ok(Paginated::from_all(services, params.normalized()))
    }

    async fn toggle_active(&self, id: Uuid) -> AppResult<Option<Service>> {
        self.toggle(id, |s| s.is_active = !s.is_active).await
    }

    async fn toggle_popular(&self, id: Uuid) -> AppResult<Option<Service>> {
        self.toggle(id, |s| s.popular = !s.popular).await
    }
}
