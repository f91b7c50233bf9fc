//! Provider repository: profile rows, request entries and client ratings.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::entities::provider::{self, active_model, Entity as ProviderEntity};
use super::entities::provider_client_rating::{self, Entity as RatingEntity};
use super::entities::provider_service_request::{self, Entity as RequestEntity};
use super::is_unique_violation;
use common::{AppError, AppResult};
use domain::{ClientRating, Provider, ProviderServiceRequest, RequestStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Provider repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Find provider by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Provider>>;

    /// Find the provider owned by an external user
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<Provider>>;

    /// Insert a new provider
    async fn create(&self, provider: Provider) -> AppResult<Provider>;

    /// Overwrite the profile columns of an existing provider
    async fn update(&self, provider: Provider) -> AppResult<Provider>;

    /// Delete provider with its requests and ratings; false if absent
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Append a service request entry
    async fn add_request(&self, request: ProviderServiceRequest) -> AppResult<ProviderServiceRequest>;

    /// Find one request entry of a provider
    async fn find_request(
        &self,
        provider_id: Uuid,
        request_id: Uuid,
    ) -> AppResult<Option<ProviderServiceRequest>>;

    /// Set the status of a provider's open entry; false if absent or already terminal
    async fn update_request_status(
        &self,
        provider_id: Uuid,
        request_id: Uuid,
        status: RequestStatus,
    ) -> AppResult<bool>;

    /// Set the status of whichever open entry carries `request_id`
    async fn update_status_by_request_id(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> AppResult<bool>;

    /// All request entries of a provider, newest first
    async fn list_requests(&self, provider_id: Uuid) -> AppResult<Vec<ProviderServiceRequest>>;

    /// Request entries (any provider) that target one of the given services
    async fn find_requests_by_services(
        &self,
        service_ids: Vec<Uuid>,
    ) -> AppResult<Vec<ProviderServiceRequest>>;

    /// Append a client rating
    async fn add_rating(&self, rating: ClientRating) -> AppResult<ClientRating>;

    /// All client ratings of a provider, oldest first
    async fn list_ratings(&self, provider_id: Uuid) -> AppResult<Vec<ClientRating>>;
}

/// Concrete implementation of ProviderRepository
pub struct ProviderStore {
    db: DatabaseConnection,
}

impl ProviderStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Rows still open to status updates
fn open_request() -> SimpleExpr {
    provider_service_request::Column::Status
        .is_not_in(RequestStatus::TERMINAL.iter().map(RequestStatus::as_str))
}

fn map_write_error(err: DbErr) -> AppError {
    if is_unique_violation(&err) {
        AppError::conflict("Provider profile")
    } else {
        AppError::from(err)
    }
}

fn into_requests(
    models: Vec<provider_service_request::Model>,
) -> AppResult<Vec<ProviderServiceRequest>> {
    models
        .into_iter()
        .map(ProviderServiceRequest::try_from)
        .collect()
}

#[async_trait]
impl ProviderRepository for ProviderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Provider>> {
        ProviderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Provider::try_from)
            .transpose()
    }

    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<Provider>> {
        ProviderEntity::find()
            .filter(provider::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map(Provider::try_from)
            .transpose()
    }

    async fn create(&self, provider: Provider) -> AppResult<Provider> {
        let model = active_model(&provider)?
            .insert(&self.db)
            .await
            .map_err(map_write_error)?;

        Provider::try_from(model)
    }

    async fn update(&self, provider: Provider) -> AppResult<Provider> {
        let mut active = active_model(&provider)?;
        active.user_id = NotSet;
        active.created_at = NotSet;

        match active.update(&self.db).await {
            Ok(model) => Provider::try_from(model),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("Provider")),
            Err(e) => Err(map_write_error(e)),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        RequestEntity::delete_many()
            .filter(provider_service_request::Column::ProviderId.eq(id))
            .exec(&self.db)
            .await?;
        RatingEntity::delete_many()
            .filter(provider_client_rating::Column::ProviderId.eq(id))
            .exec(&self.db)
            .await?;

        let result = ProviderEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn add_request(&self, request: ProviderServiceRequest) -> AppResult<ProviderServiceRequest> {
        let model = provider_service_request::ActiveModel::from(&request)
            .insert(&self.db)
            .await?;

        ProviderServiceRequest::try_from(model)
    }

    async fn find_request(
        &self,
        provider_id: Uuid,
        request_id: Uuid,
    ) -> AppResult<Option<ProviderServiceRequest>> {
        RequestEntity::find_by_id(request_id)
            .filter(provider_service_request::Column::ProviderId.eq(provider_id))
            .one(&self.db)
            .await?
            .map(ProviderServiceRequest::try_from)
            .transpose()
    }

    async fn update_request_status(
        &self,
        provider_id: Uuid,
        request_id: Uuid,
        status: RequestStatus,
    ) -> AppResult<bool> {
        let result = RequestEntity::update_many()
            .col_expr(
                provider_service_request::Column::Status,
                Expr::value(status.as_str()),
            )
            .col_expr(provider_service_request::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(provider_service_request::Column::RequestId.eq(request_id))
            .filter(provider_service_request::Column::ProviderId.eq(provider_id))
            .filter(open_request())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn update_status_by_request_id(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> AppResult<bool> {
        let result = RequestEntity::update_many()
            .col_expr(
                provider_service_request::Column::Status,
                Expr::value(status.as_str()),
            )
            .col_expr(provider_service_request::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(provider_service_request::Column::RequestId.eq(request_id))
            .filter(open_request())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_requests(&self, provider_id: Uuid) -> AppResult<Vec<ProviderServiceRequest>> {
        let models = RequestEntity::find()
            .filter(provider_service_request::Column::ProviderId.eq(provider_id))
            .order_by_desc(provider_service_request::Column::RequestDate)
            .all(&self.db)
            .await?;

        into_requests(models)
    }

    async fn find_requests_by_services(
        &self,
        service_ids: Vec<Uuid>,
    ) -> AppResult<Vec<ProviderServiceRequest>> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = RequestEntity::find()
            .filter(provider_service_request::Column::ServiceId.is_in(service_ids))
            .all(&self.db)
            .await?;

        into_requests(models)
    }

    async fn add_rating(&self, rating: ClientRating) -> AppResult<ClientRating> {
        let model = provider_client_rating::ActiveModel::from(&rating)
            .insert(&self.db)
            .await?;

        Ok(ClientRating::from(model))
    }

    async fn list_ratings(&self, provider_id: Uuid) -> AppResult<Vec<ClientRating>> {
        let models = RatingEntity::find()
            .filter(provider_client_rating::Column::ProviderId.eq(provider_id))
            .order_by_asc(provider_client_rating::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(ClientRating::from).collect())
    }
}
