//! Client repository: profile rows, request history and provider ratings.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::client::{self, ActiveModel, Entity as ClientEntity};
use super::entities::client_provider_rating::{self, Entity as RatingEntity};
use super::entities::client_service_request::{self, Entity as RequestEntity};
use super::is_unique_violation;
use crate::config::MAX_PAGE_NUMBER;
use common::{AppError, AppResult};
use domain::{Client, ClientServiceRequest, ProviderRating, RequestStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Client repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Find client by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Client>>;

    /// Find the client owned by an external user
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<Client>>;

    /// Insert a new client
    async fn create(&self, client: Client) -> AppResult<Client>;

    /// Overwrite the profile columns of an existing client
    async fn update(&self, client: Client) -> AppResult<Client>;

    /// Delete client with its history and ratings; false if absent
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Append a history entry
    async fn add_request(&self, request: ClientServiceRequest) -> AppResult<ClientServiceRequest>;

    /// Find one history entry of a client
    async fn find_request(
        &self,
        client_id: Uuid,
        request_id: Uuid,
    ) -> AppResult<Option<ClientServiceRequest>>;

    /// Set the status of a client's open entry; false if absent or already terminal
    async fn update_request_status(
        &self,
        client_id: Uuid,
        request_id: Uuid,
        status: RequestStatus,
    ) -> AppResult<bool>;

    /// Set the status of whichever open entry carries `request_id`
    async fn update_status_by_request_id(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> AppResult<bool>;

    /// Whole history of a client, newest first
    async fn list_requests(&self, client_id: Uuid) -> AppResult<Vec<ClientServiceRequest>>;

    /// One page (1-based) of history plus the total matching entries
    async fn page_requests(
        &self,
        client_id: Uuid,
        status: Option<RequestStatus>,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<ClientServiceRequest>, u64)>;

    /// Append a provider rating
    async fn add_rating(&self, rating: ProviderRating) -> AppResult<ProviderRating>;

    /// All ratings a client gave, oldest first
    async fn list_ratings(&self, client_id: Uuid) -> AppResult<Vec<ProviderRating>>;
}

/// Concrete implementation of ClientRepository
pub struct ClientStore {
    db: DatabaseConnection,
}

impl ClientStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Rows still open to status updates
fn open_request() -> SimpleExpr {
    client_service_request::Column::Status
        .is_not_in(RequestStatus::TERMINAL.iter().map(RequestStatus::as_str))
}

fn map_write_error(err: DbErr) -> AppError {
    if is_unique_violation(&err) {
        AppError::conflict("Client profile")
    } else {
        AppError::from(err)
    }
}

fn into_requests(
    models: Vec<client_service_request::Model>,
) -> AppResult<Vec<ClientServiceRequest>> {
    models
        .into_iter()
        .map(ClientServiceRequest::try_from)
        .collect()
}

#[async_trait]
impl ClientRepository for ClientStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Client>> {
        let result = ClientEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Client::from))
    }

    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<Client>> {
        let result = ClientEntity::find()
            .filter(client::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        Ok(result.map(Client::from))
    }

    async fn create(&self, client: Client) -> AppResult<Client> {
        let model = ActiveModel::from(&client)
            .insert(&self.db)
            .await
            .map_err(map_write_error)?;

        Ok(Client::from(model))
    }

    async fn update(&self, client: Client) -> AppResult<Client> {
        let mut active = ActiveModel::from(&client);
        active.user_id = NotSet;
        active.created_at = NotSet;

        match active.update(&self.db).await {
            Ok(model) => Ok(Client::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("Client")),
            Err(e) => Err(map_write_error(e)),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        RequestEntity::delete_many()
            .filter(client_service_request::Column::ClientId.eq(id))
            .exec(&self.db)
            .await?;
        RatingEntity::delete_many()
            .filter(client_provider_rating::Column::ClientId.eq(id))
            .exec(&self.db)
            .await?;

        let result = ClientEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn add_request(&self, request: ClientServiceRequest) -> AppResult<ClientServiceRequest> {
        let model = client_service_request::ActiveModel::from(&request)
            .insert(&self.db)
            .await?;

        ClientServiceRequest::try_from(model)
    }

    async fn find_request(
        &self,
        client_id: Uuid,
        request_id: Uuid,
    ) -> AppResult<Option<ClientServiceRequest>> {
        RequestEntity::find_by_id(request_id)
            .filter(client_service_request::Column::ClientId.eq(client_id))
            .one(&self.db)
            .await?
            .map(ClientServiceRequest::try_from)
            .transpose()
    }

    async fn update_request_status(
        &self,
        client_id: Uuid,
        request_id: Uuid,
        status: RequestStatus,
    ) -> AppResult<bool> {
        let result = RequestEntity::update_many()
            .col_expr(client_service_request::Column::Status, Expr::value(status.as_str()))
            .col_expr(client_service_request::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(client_service_request::Column::RequestId.eq(request_id))
            .filter(client_service_request::Column::ClientId.eq(client_id))
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
            .col_expr(client_service_request::Column::Status, Expr::value(status.as_str()))
            .col_expr(client_service_request::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(client_service_request::Column::RequestId.eq(request_id))
            .filter(open_request())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_requests(&self, client_id: Uuid) -> AppResult<Vec<ClientServiceRequest>> {
        let models = RequestEntity::find()
            .filter(client_service_request::Column::ClientId.eq(client_id))
            .order_by_desc(client_service_request::Column::RequestDate)
            .all(&self.db)
            .await?;

        into_requests(models)
    }

    async fn page_requests(
        &self,
        client_id: Uuid,
        status: Option<RequestStatus>,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<ClientServiceRequest>, u64)> {
        let mut query = RequestEntity::find()
            .filter(client_service_request::Column::ClientId.eq(client_id));

        if let Some(status) = status {
            query = query.filter(client_service_request::Column::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_desc(client_service_request::Column::RequestDate)
            .paginate(&self.db, limit.max(1));

        let total = paginator.num_items().await?;
        let models = paginator
            .fetch_page(page.clamp(1, MAX_PAGE_NUMBER) - 1)
            .await?;

        Ok((into_requests(models)?, total))
    }

    async fn add_rating(&self, rating: ProviderRating) -> AppResult<ProviderRating> {
        let model = client_provider_rating::ActiveModel::from(&rating)
            .insert(&self.db)
            .await?;

        Ok(ProviderRating::from(model))
    }

    async fn list_ratings(&self, client_id: Uuid) -> AppResult<Vec<ProviderRating>> {
        let models = RatingEntity::find()
            .filter(client_provider_rating::Column::ClientId.eq(client_id))
            .order_by_asc(client_provider_rating::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(ProviderRating::from).collect())
    }
}
