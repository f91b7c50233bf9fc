//! Client profiles, their request history and the ratings they give providers.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use common::{AppError, AppResult, OptionExt};
use domain::contact::normalize_display_name;
use domain::rating::normalize_review;
use domain::{
    average_rating, is_valid_id_type, validate_rating, Client, ClientRating, ClientServiceRequest,
    ClientStats, CreateClient, NewClientServiceRequest, NewProviderRating, ProviderRating,
    ProviderServiceRequest, ProviderSnapshot, RequestStatus, StatusBreakdown, UpdateClient,
    VALID_ID_TYPES,
};

/// Client service trait for dependency injection.
#[async_trait]
pub trait ClientService: Send + Sync {
    /// Create the client profile of a user (one per user)
    async fn create_client(&self, user_id: String, input: CreateClient) -> AppResult<Client>;

    /// Get client by ID
    async fn get_client(&self, id: Uuid) -> AppResult<Option<Client>>;

    /// Get the client owned by a user
    async fn get_client_by_user(&self, user_id: &str) -> AppResult<Option<Client>>;

    /// Merge a partial profile update
    async fn update_client(&self, id: Uuid, input: UpdateClient) -> AppResult<Option<Client>>;

    /// Delete a client with its history and ratings
    async fn delete_client(&self, id: Uuid) -> AppResult<bool>;

    /// File a request against a provider's service
    async fn add_service_request(
        &self,
        client_id: Uuid,
        input: NewClientServiceRequest,
    ) -> AppResult<ClientServiceRequest>;

    /// Move a history entry to a new status
    async fn update_request_status(
        &self,
        client_id: Uuid,
        request_id: Uuid,
        status: &str,
    ) -> AppResult<ClientServiceRequest>;

    /// Rate a provider; a client cannot rate a provider profile of its own user
    async fn add_provider_rating(
        &self,
        client_id: Uuid,
        input: NewProviderRating,
    ) -> AppResult<ProviderRating>;

    /// All ratings a client gave
    async fn list_provider_ratings(&self, client_id: Uuid) -> AppResult<Vec<ProviderRating>>;

    /// Page through history, newest first, optionally filtered by status
    async fn request_history(
        &self,
        client_id: Uuid,
        params: PaginationParams,
        status: Option<String>,
    ) -> AppResult<Paginated<ClientServiceRequest>>;

    /// Request counts by status plus the ratings given
    async fn client_stats(&self, client_id: Uuid) -> AppResult<ClientStats>;
}

/// Concrete implementation of ClientService using Unit of Work.
pub struct ClientManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ClientManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn require(&self, id: Uuid) -> AppResult<Client> {
        self.uow
            .clients()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Client")
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_id_type(id_type: Option<String>) -> AppResult<Option<String>> {
    match normalize_optional(id_type) {
        Some(t) if !is_valid_id_type(&t) => Err(AppError::validation(format!(
            "Id type must be one of: {}",
            VALID_ID_TYPES.join(", ")
        ))),
        other => Ok(other),
    }
}

#[async_trait]
impl<U: UnitOfWork> ClientService for ClientManager<U> {
    async fn create_client(&self, user_id: String, input: CreateClient) -> AppResult<Client> {
        let name = normalize_display_name(&input.name)?;
        let id_type = check_id_type(input.id_type)?;

        if self.uow.clients().find_by_user_id(&user_id).await?.is_some() {
            return Err(AppError::conflict("Client profile"));
        }

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            user_id,
            name,
            contact: input.contact.normalized(),
            location: normalize_optional(input.location),
            id_type,
            id_number: normalize_optional(input.id_number),
            created_at: now,
            updated_at: now,
        };

        let client = self.uow.clients().create(client).await?;
        tracing::info!(client_id = %client.id, "Client created");
        Ok(client)
    }

    async fn get_client(&self, id: Uuid) -> AppResult<Option<Client>> {
        self.uow.clients().find_by_id(id).await
    }

    async fn get_client_by_user(&self, user_id: &str) -> AppResult<Option<Client>> {
        self.uow.clients().find_by_user_id(user_id).await
    }

    async fn update_client(&self, id: Uuid, input: UpdateClient) -> AppResult<Option<Client>> {
        let Some(mut client) = self.uow.clients().find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = input.name.as_deref() {
            client.name = normalize_display_name(name)?;
        }
        if let Some(contact) = input.contact {
            client.contact = contact.normalized();
        }
        if input.location.is_some() {
            client.location = normalize_optional(input.location);
        }
        if input.id_type.is_some() {
            client.id_type = check_id_type(input.id_type)?;
        }
        if input.id_number.is_some() {
            client.id_number = normalize_optional(input.id_number);
        }
        client.updated_at = Utc::now();

        self.uow.clients().update(client).await.map(Some)
    }

    async fn delete_client(&self, id: Uuid) -> AppResult<bool> {
        let deleted = self.uow.clients().delete(id).await?;
        if deleted {
            tracing::info!(client_id = %id, "Client deleted");
        }
        Ok(deleted)
    }

    async fn add_service_request(
        &self,
        client_id: Uuid,
        input: NewClientServiceRequest,
    ) -> AppResult<ClientServiceRequest> {
        let client = self.require(client_id).await?;
        self.uow
            .services()
            .find_by_id(input.service_id)
            .await?
            .ok_or_not_found("Service")?;
        let provider = self
            .uow
            .providers()
            .find_by_id(input.provider_id)
            .await?
            .ok_or_not_found("Provider")?;

        let now = Utc::now();
        let entry = ClientServiceRequest {
            request_id: Uuid::new_v4(),
            client_id,
            service_id: input.service_id,
            provider_id: provider.id,
            provider: ProviderSnapshot::from(&provider),
            request_date: now,
            status: RequestStatus::Pending,
            updated_at: now,
        };
        let entry = self.uow.clients().add_request(entry).await?;
        tracing::info!(%client_id, request_id = %entry.request_id, "Service request filed");

        // Provider inbox copy is best-effort
        let inbox = ProviderServiceRequest {
            request_id: entry.request_id,
            provider_id: provider.id,
            service_id: entry.service_id,
            client_id: client.user_id,
            request_date: entry.request_date,
            status: RequestStatus::Pending,
            updated_at: now,
        };
        if let Err(e) = self.uow.providers().add_request(inbox).await {
            tracing::warn!(
                request_id = %entry.request_id,
                provider_id = %provider.id,
                error = %e,
                "Failed to copy service request to provider"
            );
        }

        Ok(entry)
    }

    async fn update_request_status(
        &self,
        client_id: Uuid,
        request_id: Uuid,
        status: &str,
    ) -> AppResult<ClientServiceRequest> {
        let next: RequestStatus = status.parse()?;

        let mut request = self
            .uow
            .clients()
            .find_request(client_id, request_id)
            .await?
            .ok_or_not_found("Service request")?;
        request.status = request.status.transition_to(next)?;

        if !self
            .uow
            .clients()
            .update_request_status(client_id, request_id, next)
            .await?
        {
            // Finalized or removed since it was read
            let current = self
                .uow
                .clients()
                .find_request(client_id, request_id)
                .await?
                .ok_or_not_found("Service request")?;
            current.status.transition_to(next)?;
            return Err(AppError::not_found("Service request"));
        }
        request.updated_at = Utc::now();
        tracing::info!(%client_id, %request_id, status = %next, "Service request status updated");

        // A cancellation closes the provider's entry too, best-effort
        if next == RequestStatus::Cancelled {
            match self
                .uow
                .providers()
                .update_status_by_request_id(request_id, next)
                .await
            {
                Ok(true) => {}
                Ok(false) => tracing::debug!(%request_id, "No open provider entry to cancel"),
                Err(e) => tracing::warn!(%request_id, error = %e, "Failed to mirror cancellation onto provider"),
            }
        }

        Ok(request)
    }

    async fn add_provider_rating(
        &self,
        client_id: Uuid,
        input: NewProviderRating,
    ) -> AppResult<ProviderRating> {
        let rating = validate_rating(input.rating)?;
        let review = normalize_review(input.review)?;
        let client = self.require(client_id).await?;
        let provider = self
            .uow
            .providers()
            .find_by_id(input.provider_id)
            .await?
            .ok_or_not_found("Provider")?;

        if provider.is_owned_by(&client.user_id) {
            return Err(AppError::SelfRating);
        }

        let now = Utc::now();
        let entry = ProviderRating {
            id: Uuid::new_v4(),
            client_id,
            provider_id: provider.id,
            service_id: input.service_id,
            rating,
            review: review.clone(),
            date: now,
        };
        let entry = self.uow.clients().add_rating(entry).await?;
        tracing::info!(%client_id, provider_id = %provider.id, rating, "Provider rating recorded");

        let mirror = ClientRating {
            id: Uuid::new_v4(),
            provider_id: provider.id,
            client_id: client.user_id,
            request_id: None,
            service_id: Some(input.service_id),
            rating,
            review,
            date: now,
        };
        if let Err(e) = self.uow.providers().add_rating(mirror).await {
            tracing::warn!(provider_id = %provider.id, error = %e, "Failed to copy rating to provider");
        }

        Ok(entry)
    }

    async fn list_provider_ratings(&self, client_id: Uuid) -> AppResult<Vec<ProviderRating>> {
        self.require(client_id).await?;
        self.uow.clients().list_ratings(client_id).await
    }

    async fn request_history(
        &self,
        client_id: Uuid,
        params: PaginationParams,
        status: Option<String>,
    ) -> AppResult<Paginated<ClientServiceRequest>> {
        let status = status
            .as_deref()
            .map(str::parse::<RequestStatus>)
            .transpose()?;
        self.require(client_id).await?;

        let params = params.normalized();
        let (items, total) = self
            .uow
            .clients()
            .page_requests(client_id, status, params.page, params.limit)
            .await?;

        Ok(Paginated::new(items, params, total))
    }

    async fn client_stats(&self, client_id: Uuid) -> AppResult<ClientStats> {
        self.require(client_id).await?;
        let repo = self.uow.clients();
        let (requests, ratings) = futures::try_join!(
            repo.list_requests(client_id),
            repo.list_ratings(client_id)
        )?;

        Ok(ClientStats {
            requests: StatusBreakdown::tally(requests.iter().map(|r| r.status)),
            ratings_given: ratings.len() as u64,
            average_rating_given: average_rating(ratings.iter().map(|r| r.rating)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUnitOfWork;
    use crate::repository::{MockClientRepository, MockProviderRepository, MockServiceRepository};
    use crate::service::testing::people_uow;
    use domain::{ContactDetails, Pricing, Provider, Service};

    fn client(user_id: &str) -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: "Ngozi".to_string(),
            contact: ContactDetails::default(),
            location: None,
            id_type: None,
            id_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn provider(user_id: &str) -> Provider {
        let now = Utc::now();
        Provider {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: "Bola Plumbing".to_string(),
            contact: ContactDetails {
                phone: Some("+2348012345678".to_string()),
                ..Default::default()
            },
            witnesses: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn service() -> Service {
        let now = Utc::now();
        Service {
            id: Uuid::new_v4(),
            title: "Leak repair".to_string(),
            description: String::new(),
            long_description: None,
            category_id: Uuid::new_v4(),
            icon: None,
            pricing: Pricing {
                base_price: 30.0,
                currency: "usd".to_string(),
                percentage_charge: None,
                additional_fees: vec![],
                notes: None,
            },
            locations: Default::default(),
            tags: Default::default(),
            is_active: true,
            popular: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn history_entry(client_id: Uuid, status: RequestStatus) -> ClientServiceRequest {
        let now = Utc::now();
        ClientServiceRequest {
            request_id: Uuid::new_v4(),
            client_id,
            service_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            provider: ProviderSnapshot {
                name: "Bola Plumbing".to_string(),
                contact: None,
            },
            request_date: now,
            status,
            updated_at: now,
        }
    }

    fn manager(
        services: MockServiceRepository,
        providers: MockProviderRepository,
        clients: MockClientRepository,
    ) -> ClientManager<MockUnitOfWork> {
        ClientManager::new(people_uow(services, providers, clients))
    }

    #[tokio::test]
    async fn unknown_id_type_is_rejected() {
        let mut clients = MockClientRepository::new();
        clients.expect_create().never();

        let result = manager(MockServiceRepository::new(), MockProviderRepository::new(), clients)
            .create_client(
                "user-1".to_string(),
                CreateClient {
                    name: "Ngozi".to_string(),
                    id_type: Some("library-card".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn request_snapshots_provider_and_copies_to_inbox() {
        let c = client("client-user");
        let client_id = c.id;
        let p = provider("provider-user");
        let provider_id = p.id;
        let s = service();
        let service_id = s.id;

        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_id()
            .returning(move |_| Ok(Some(c.clone())));
        clients.expect_add_request().times(1).returning(Ok);
        let mut services = MockServiceRepository::new();
        services
            .expect_find_by_id()
            .returning(move |_| Ok(Some(s.clone())));
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        providers
            .expect_add_request()
            .withf(|r| r.client_id == "client-user" && r.status == RequestStatus::Pending)
            .times(1)
            .returning(Ok);

        let entry = manager(services, providers, clients)
            .add_service_request(
                client_id,
                NewClientServiceRequest {
                    service_id,
                    provider_id,
                },
            )
            .await
            .unwrap();

        assert_eq!(entry.status, RequestStatus::Pending);
        assert_eq!(entry.provider.name, "Bola Plumbing");
        assert_eq!(entry.provider.contact.as_deref(), Some("+2348012345678"));
    }

    #[tokio::test]
    async fn request_for_missing_service_fails() {
        let c = client("client-user");
        let client_id = c.id;
        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_id()
            .returning(move |_| Ok(Some(c.clone())));
        clients.expect_add_request().never();
        let mut services = MockServiceRepository::new();
        services.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(services, MockProviderRepository::new(), clients)
            .add_service_request(
                client_id,
                NewClientServiceRequest {
                    service_id: Uuid::new_v4(),
                    provider_id: Uuid::new_v4(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(e)) if e == "Service"));
    }

    #[tokio::test]
    async fn client_cannot_rate_own_provider_profile() {
        let c = client("same-user");
        let client_id = c.id;
        let p = provider("same-user");
        let provider_id = p.id;

        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_id()
            .returning(move |_| Ok(Some(c.clone())));
        clients.expect_add_rating().never();
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));

        let result = manager(MockServiceRepository::new(), providers, clients)
            .add_provider_rating(
                client_id,
                NewProviderRating {
                    provider_id,
                    service_id: Uuid::new_v4(),
                    rating: 4,
                    review: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::SelfRating)));
    }

    #[tokio::test]
    async fn history_rejects_unknown_status_filter() {
        let mut clients = MockClientRepository::new();
        clients.expect_page_requests().never();

        let result = manager(MockServiceRepository::new(), MockProviderRepository::new(), clients)
            .request_history(
                Uuid::new_v4(),
                PaginationParams::default(),
                Some("archived".to_string()),
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn history_reports_page_metadata() {
        let c = client("client-user");
        let client_id = c.id;
        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_id()
            .returning(move |_| Ok(Some(c.clone())));
        clients
            .expect_page_requests()
            .withf(|_, status, page, limit| {
                *status == Some(RequestStatus::Completed) && *page == 2 && *limit == 2
            })
            .returning(|cid, _, _, _| {
                Ok((vec![history_entry(cid, RequestStatus::Completed)], 3))
            });

        let page = manager(MockServiceRepository::new(), MockProviderRepository::new(), clients)
            .request_history(
                client_id,
                PaginationParams::new(2, 2),
                Some("completed".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[tokio::test]
    async fn cancellation_is_copied_to_provider_entry() {
        let client_id = Uuid::new_v4();
        let request_id = Uuid::new_v4();
        let mut clients = MockClientRepository::new();
        clients
            .expect_find_request()
            .returning(|cid, _| Ok(Some(history_entry(cid, RequestStatus::Pending))));
        clients
            .expect_update_request_status()
            .times(1)
            .returning(|_, _, _| Ok(true));
        let mut providers = MockProviderRepository::new();
        providers
            .expect_update_status_by_request_id()
            .withf(move |rid, status| *rid == request_id && *status == RequestStatus::Cancelled)
            .times(1)
            .returning(|_, _| Err(AppError::service_unavailable("database")));

        let updated = manager(MockServiceRepository::new(), providers, clients)
            .update_request_status(client_id, request_id, "cancelled")
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::Cancelled);
    }

    #[tokio::test]
    async fn progress_update_stays_on_client_side() {
        let client_id = Uuid::new_v4();
        let mut clients = MockClientRepository::new();
        clients
            .expect_find_request()
            .returning(|cid, _| Ok(Some(history_entry(cid, RequestStatus::Pending))));
        clients
            .expect_update_request_status()
            .times(1)
            .returning(|_, _, _| Ok(true));
        let mut providers = MockProviderRepository::new();
        providers.expect_update_status_by_request_id().never();

        let updated = manager(MockServiceRepository::new(), providers, clients)
            .update_request_status(client_id, Uuid::new_v4(), "in-progress")
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::InProgress);
    }
}
