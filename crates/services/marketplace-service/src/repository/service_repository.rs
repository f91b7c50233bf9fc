//! Service repository implementation.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::entities::service::{self, active_model, Entity as ServiceEntity};
use common::{AppError, AppResult};
use domain::{Service, ServiceFilters};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service repository trait for dependency injection.
///
/// Listings are ordered newest first.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Find service by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>>;

    /// Resolve a batch of ids; missing ids are skipped
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Service>>;

    /// Insert a new service
    async fn create(&self, service: Service) -> AppResult<Service>;

    /// Overwrite every mutable column of an existing service
    async fn update(&self, service: Service) -> AppResult<Service>;

    /// Delete service by ID; false if absent
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// All services matching the filters
    async fn list(&self, filters: ServiceFilters) -> AppResult<Vec<Service>>;

    /// Active services flagged popular, capped at `limit`
    async fn find_popular(&self, limit: u64) -> AppResult<Vec<Service>>;

    /// Ids of services whose category_id matches, active or not
    async fn ids_by_category(&self, category_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Live (category_id, service count) pairs from the service rows
    async fn live_counts(&self) -> AppResult<Vec<(Uuid, u64)>>;

    /// Every (service_id, category_id) pair
    async fn category_links(&self) -> AppResult<Vec<(Uuid, Uuid)>>;
}

/// Concrete implementation of ServiceRepository
pub struct ServiceStore {
    db: DatabaseConnection,
}

impl ServiceStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_services(models: Vec<service::Model>) -> AppResult<Vec<Service>> {
    models.into_iter().map(Service::try_from).collect()
}

#[async_trait]
impl ServiceRepository for ServiceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>> {
        ServiceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Service::try_from)
            .transpose()
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Service>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ServiceEntity::find()
            .filter(service::Column::Id.is_in(ids))
            .order_by_desc(service::Column::CreatedAt)
            .all(&self.db)
            .await?;

        into_services(models)
    }

    async fn create(&self, service: Service) -> AppResult<Service> {
        let model = active_model(&service)?.insert(&self.db).await?;
        Service::try_from(model)
    }

    async fn update(&self, service: Service) -> AppResult<Service> {
        let mut active = active_model(&service)?;
        active.created_at = NotSet;

        match active.update(&self.db).await {
            Ok(model) => Service::try_from(model),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("Service")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = ServiceEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, filters: ServiceFilters) -> AppResult<Vec<Service>> {
        let mut query = ServiceEntity::find();

        if let Some(category_id) = filters.category_id {
            query = query.filter(service::Column::CategoryId.eq(category_id));
        }
        if let Some(active) = filters.is_active {
            query = query.filter(service::Column::IsActive.eq(active));
        }
        if let Some(popular) = filters.popular {
            query = query.filter(service::Column::Popular.eq(popular));
        }
        if let Some(min) = filters.min_price {
            query = query.filter(service::Column::BasePrice.gte(min));
        }
        if let Some(max) = filters.max_price {
            query = query.filter(service::Column::BasePrice.lte(max));
        }

        let models = query
            .order_by_desc(service::Column::CreatedAt)
            .all(&self.db)
            .await?;

        // Locations and free text live in JSON columns; match them here
        Ok(into_services(models)?
            .into_iter()
            .filter(|s| filters.matches(s))
            .collect())
    }

    async fn find_popular(&self, limit: u64) -> AppResult<Vec<Service>> {
        let models = ServiceEntity::find()
            .filter(service::Column::IsActive.eq(true))
            .filter(service::Column::Popular.eq(true))
            .order_by_desc(service::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        into_services(models)
    }

    async fn ids_by_category(&self, category_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids = ServiceEntity::find()
            .select_only()
            .column(service::Column::Id)
            .filter(service::Column::CategoryId.eq(category_id))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await?;

        Ok(ids)
    }

    async fn live_counts(&self) -> AppResult<Vec<(Uuid, u64)>> {
        let rows = ServiceEntity::find()
            .select_only()
            .column(service::Column::CategoryId)
            .column_as(Expr::col(service::Column::Id).count(), "service_count")
            .group_by(service::Column::CategoryId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(category_id, count)| (category_id, count.max(0) as u64))
            .collect())
    }

    async fn category_links(&self) -> AppResult<Vec<(Uuid, Uuid)>> {
        let rows = ServiceEntity::find()
            .select_only()
            .column(service::Column::Id)
            .column(service::Column::CategoryId)
            .into_tuple::<(Uuid, Uuid)>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }
}
