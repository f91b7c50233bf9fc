//! Provider profiles, their service requests and the ratings clients leave.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::infra::UnitOfWork;
use common::{AppError, AppResult, OptionExt};
use domain::contact::normalize_display_name;
use domain::rating::normalize_review;
use domain::{
    average_rating, validate_rating, ClientRating, CreateProvider, NewClientRating,
    NewProviderServiceRequest, Provider, ProviderServiceRequest, ProviderStats, ProviderSummary,
    RequestStatus, StatusBreakdown, UpdateProvider, Witness,
};

/// Provider service trait for dependency injection.
#[async_trait]
pub trait ProviderService: Send + Sync {
    /// Create the provider profile of a user (one per user)
    async fn create_provider(&self, user_id: String, input: CreateProvider) -> AppResult<Provider>;

    /// Get provider by ID
    async fn get_provider(&self, id: Uuid) -> AppResult<Option<Provider>>;

    /// Get the provider owned by a user
    async fn get_provider_by_user(&self, user_id: &str) -> AppResult<Option<Provider>>;

    /// Merge a partial profile update
    async fn update_provider(&self, id: Uuid, input: UpdateProvider) -> AppResult<Option<Provider>>;

    /// Delete a provider with its requests and ratings
    async fn delete_provider(&self, id: Uuid) -> AppResult<bool>;

    /// Append a client rating; a provider cannot be rated by its own user
    async fn add_client_rating(&self, provider_id: Uuid, input: NewClientRating)
        -> AppResult<ClientRating>;

    /// Mean of all ratings, 0 when there are none
    async fn average_rating(&self, provider_id: Uuid) -> AppResult<f64>;

    /// Name with average rating and rating count
    async fn provider_summary(&self, provider_id: Uuid) -> AppResult<ProviderSummary>;

    /// All client ratings of a provider
    async fn list_client_ratings(&self, provider_id: Uuid) -> AppResult<Vec<ClientRating>>;

    /// Append a request entry with status `pending`
    async fn add_service_request(
        &self,
        provider_id: Uuid,
        input: NewProviderServiceRequest,
    ) -> AppResult<ProviderServiceRequest>;

    /// Request entries, newest first
    async fn list_service_requests(&self, provider_id: Uuid)
        -> AppResult<Vec<ProviderServiceRequest>>;

    /// Move a request to a new status, mirroring it onto the client's history
    async fn update_request_status(
        &self,
        provider_id: Uuid,
        request_id: Uuid,
        status: &str,
    ) -> AppResult<ProviderServiceRequest>;

    /// Request counts by status plus rating aggregate
    async fn provider_stats(&self, provider_id: Uuid) -> AppResult<ProviderStats>;
}

/// Concrete implementation of ProviderService using Unit of Work.
pub struct ProviderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProviderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn require(&self, id: Uuid) -> AppResult<Provider> {
        self.uow
            .providers()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Provider")
    }
}

fn validate_witnesses(witnesses: Vec<Witness>) -> AppResult<Vec<Witness>> {
    witnesses
        .into_iter()
        .map(|w| w.validated().map_err(AppError::from))
        .collect()
}

#[async_trait]
impl<U: UnitOfWork> ProviderService for ProviderManager<U> {
    async fn create_provider(&self, user_id: String, input: CreateProvider) -> AppResult<Provider> {
        let name = normalize_display_name(&input.name)?;
        let witnesses = validate_witnesses(input.witnesses)?;

        if self.uow.providers().find_by_user_id(&user_id).await?.is_some() {
            return Err(AppError::conflict("Provider profile"));
        }

        let now = Utc::now();
        let provider = Provider {
            id: Uuid::new_v4(),
            user_id,
            name,
            contact: input.contact.normalized(),
            witnesses,
            created_at: now,
            updated_at: now,
        };

        let provider = self.uow.providers().create(provider).await?;
        tracing::info!(provider_id = %provider.id, "Provider created");
        Ok(provider)
    }

    async fn get_provider(&self, id: Uuid) -> AppResult<Option<Provider>> {
        self.uow.providers().find_by_id(id).await
    }

    async fn get_provider_by_user(&self, user_id: &str) -> AppResult<Option<Provider>> {
        self.uow.providers().find_by_user_id(user_id).await
    }

    async fn update_provider(&self, id: Uuid, input: UpdateProvider) -> AppResult<Option<Provider>> {
        let Some(mut provider) = self.uow.providers().find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = input.name.as_deref() {
            provider.name = normalize_display_name(name)?;
        }
        if let Some(contact) = input.contact {
            provider.contact = contact.normalized();
        }
        if let Some(witnesses) = input.witnesses {
            provider.witnesses = validate_witnesses(witnesses)?;
        }
        provider.updated_at = Utc::now();

        self.uow.providers().update(provider).await.map(Some)
    }

    async fn delete_provider(&self, id: Uuid) -> AppResult<bool> {
        let deleted = self.uow.providers().delete(id).await?;
        if deleted {
            tracing::info!(provider_id = %id, "Provider deleted");
        }
        Ok(deleted)
    }

    async fn add_client_rating(
        &self,
        provider_id: Uuid,
        input: NewClientRating,
    ) -> AppResult<ClientRating> {
        let rating = validate_rating(input.rating)?;
        let review = normalize_review(input.review)?;
        let provider = self.require(provider_id).await?;

        if provider.is_owned_by(&input.client_id) {
            return Err(AppError::SelfRating);
        }

        let entry = ClientRating {
            id: Uuid::new_v4(),
            provider_id,
            client_id: input.client_id,
            request_id: input.request_id,
            service_id: input.service_id,
            rating,
            review,
            date: Utc::now(),
        };

        let entry = self.uow.providers().add_rating(entry).await?;
        tracing::info!(%provider_id, rating, "Client rating recorded");
        Ok(entry)
    }

    async fn average_rating(&self, provider_id: Uuid) -> AppResult<f64> {
        self.require(provider_id).await?;
        let ratings = self.uow.providers().list_ratings(provider_id).await?;
        Ok(average_rating(ratings.iter().map(|r| r.rating)))
    }

    async fn provider_summary(&self, provider_id: Uuid) -> AppResult<ProviderSummary> {
        let provider = self.require(provider_id).await?;
        let ratings = self.uow.providers().list_ratings(provider_id).await?;

        Ok(ProviderSummary {
            id: provider.id,
            name: provider.name,
            average_rating: average_rating(ratings.iter().map(|r| r.rating)),
            total_ratings: ratings.len() as u64,
        })
    }

    async fn list_client_ratings(&self, provider_id: Uuid) -> AppResult<Vec<ClientRating>> {
        self.require(provider_id).await?;
        self.uow.providers().list_ratings(provider_id).await
    }

    async fn add_service_request(
        &self,
        provider_id: Uuid,
        input: NewProviderServiceRequest,
    ) -> AppResult<ProviderServiceRequest> {
        self.require(provider_id).await?;

        let now = Utc::now();
        let request = ProviderServiceRequest {
            request_id: input.request_id.unwrap_or_else(Uuid::new_v4),
            provider_id,
            service_id: input.service_id,
            client_id: input.client_id,
            request_date: input.request_date.unwrap_or(now),
            status: RequestStatus::Pending,
            updated_at: now,
        };

        self.uow.providers().add_request(request).await
    }

    async fn list_service_requests(
        &self,
        provider_id: Uuid,
    ) -> AppResult<Vec<ProviderServiceRequest>> {
        self.require(provider_id).await?;
        self.uow.providers().list_requests(provider_id).await
    }

    async fn update_request_status(
        &self,
        provider_id: Uuid,
        request_id: Uuid,
        status: &str,
    ) -> AppResult<ProviderServiceRequest> {
        let next: RequestStatus = status.parse()?;

        let mut request = self
            .uow
            .providers()
            .find_request(provider_id, request_id)
            .await?
            .ok_or_not_found("Service request")?;
        request.status = request.status.transition_to(next)?;

        if !self
            .uow
            .providers()
            .update_request_status(provider_id, request_id, next)
            .await?
        {
            // Finalized or removed since it was read
            let current = self
                .uow
                .providers()
                .find_request(provider_id, request_id)
                .await?
                .ok_or_not_found("Service request")?;
            current.status.transition_to(next)?;
            return Err(AppError::not_found("Service request"));
        }
        request.updated_at = Utc::now();
        tracing::info!(%provider_id, %request_id, status = %next, "Service request status updated");

        // Client history mirror is best-effort
        match self
            .uow
            .clients()
            .update_status_by_request_id(request_id, next)
            .await
        {
            Ok(true) => {}
            Ok(false) => tracing::debug!(%request_id, "No client history entry to mirror status onto"),
            Err(e) => tracing::warn!(%request_id, error = %e, "Failed to mirror status onto client history"),
        }

        Ok(request)
    }

    async fn provider_stats(&self, provider_id: Uuid) -> AppResult<ProviderStats> {
        self.require(provider_id).await?;
        let repo = self.uow.providers();
        let (requests, ratings) = futures::try_join!(
            repo.list_requests(provider_id),
            repo.list_ratings(provider_id)
        )?;

        Ok(ProviderStats {
            requests: StatusBreakdown::tally(requests.iter().map(|r| r.status)),
            average_rating: average_rating(ratings.iter().map(|r| r.rating)),
            total_ratings: ratings.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUnitOfWork;
    use crate::repository::{MockClientRepository, MockProviderRepository, MockServiceRepository};
    use crate::service::testing::people_uow;
    use domain::ContactDetails;

    fn provider(user_id: &str) -> Provider {
        let now = Utc::now();
        Provider {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: "Bola Plumbing".to_string(),
            contact: ContactDetails::default(),
            witnesses: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn request(provider_id: Uuid, status: RequestStatus) -> ProviderServiceRequest {
        let now = Utc::now();
        ProviderServiceRequest {
            request_id: Uuid::new_v4(),
            provider_id,
            service_id: Uuid::new_v4(),
            client_id: "client-user".to_string(),
            request_date: now,
            status,
            updated_at: now,
        }
    }

    fn rating(provider_id: Uuid, value: i32) -> ClientRating {
        ClientRating {
            id: Uuid::new_v4(),
            provider_id,
            client_id: "client-user".to_string(),
            request_id: None,
            service_id: None,
            rating: value,
            review: None,
            date: Utc::now(),
        }
    }

    fn new_rating(client_id: &str, value: i32) -> NewClientRating {
        NewClientRating {
            client_id: client_id.to_string(),
            request_id: None,
            service_id: None,
            rating: value,
            review: None,
        }
    }

    fn manager(
        providers: MockProviderRepository,
        clients: MockClientRepository,
    ) -> ProviderManager<MockUnitOfWork> {
        ProviderManager::new(people_uow(MockServiceRepository::new(), providers, clients))
    }

    #[tokio::test]
    async fn second_profile_for_same_user_conflicts() {
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_by_user_id()
            .returning(|user| Ok(Some(provider(user))));
        providers.expect_create().never();

        let result = manager(providers, MockClientRepository::new())
            .create_provider(
                "user-1".to_string(),
                CreateProvider {
                    name: "Bola".to_string(),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn average_of_no_ratings_is_zero() {
        let p = provider("user-1");
        let id = p.id;
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        providers.expect_list_ratings().returning(|_| Ok(vec![]));

        let avg = manager(providers, MockClientRepository::new())
            .average_rating(id)
            .await
            .unwrap();

        assert_eq!(avg, 0.0);
    }

    #[tokio::test]
    async fn average_of_five_three_four_is_four() {
        let p = provider("user-1");
        let id = p.id;
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        providers
            .expect_list_ratings()
            .returning(move |pid| Ok(vec![rating(pid, 5), rating(pid, 3), rating(pid, 4)]));

        let avg = manager(providers, MockClientRepository::new())
            .average_rating(id)
            .await
            .unwrap();

        assert_eq!(avg, 4.0);
    }

    #[tokio::test]
    async fn out_of_range_rating_is_rejected() {
        let mut providers = MockProviderRepository::new();
        providers.expect_add_rating().never();

        let result = manager(providers, MockClientRepository::new())
            .add_client_rating(Uuid::new_v4(), new_rating("client-user", 6))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn provider_cannot_rate_itself() {
        let p = provider("user-1");
        let id = p.id;
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        providers.expect_add_rating().never();

        let result = manager(providers, MockClientRepository::new())
            .add_client_rating(id, new_rating("user-1", 3))
            .await;

        assert!(matches!(result, Err(AppError::SelfRating)));
    }

    #[tokio::test]
    async fn unknown_status_leaves_request_untouched() {
        let mut providers = MockProviderRepository::new();
        providers.expect_find_request().never();
        providers.expect_update_request_status().never();

        let result = manager(providers, MockClientRepository::new())
            .update_request_status(Uuid::new_v4(), Uuid::new_v4(), "bogus")
            .await;

        assert!(matches!(result, Err(AppError::InvalidStatus(s)) if s == "bogus"));
    }

    #[tokio::test]
    async fn terminal_request_cannot_move() {
        let provider_id = Uuid::new_v4();
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_request()
            .returning(move |pid, _| Ok(Some(request(pid, RequestStatus::Completed))));
        providers.expect_update_request_status().never();

        let result = manager(providers, MockClientRepository::new())
            .update_request_status(provider_id, Uuid::new_v4(), "pending")
            .await;

        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn request_finalized_between_read_and_write_is_rejected() {
        let provider_id = Uuid::new_v4();
        let mut seq = mockall::Sequence::new();
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_request()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |pid, _| Ok(Some(request(pid, RequestStatus::Pending))));
        providers
            .expect_update_request_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(false));
        providers
            .expect_find_request()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |pid, _| Ok(Some(request(pid, RequestStatus::Cancelled))));
        let mut clients = MockClientRepository::new();
        clients.expect_update_status_by_request_id().never();

        let result = manager(providers, clients)
            .update_request_status(provider_id, Uuid::new_v4(), "completed")
            .await;

        assert!(matches!(result, Err(AppError::InvalidTransition(s)) if s == "cancelled"));
    }

    #[tokio::test]
    async fn status_update_survives_mirror_failure() {
        let provider_id = Uuid::new_v4();
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_request()
            .returning(move |pid, _| Ok(Some(request(pid, RequestStatus::Pending))));
        providers
            .expect_update_request_status()
            .returning(|_, _, _| Ok(true));
        let mut clients = MockClientRepository::new();
        clients
            .expect_update_status_by_request_id()
            .times(1)
            .returning(|_, _| Err(AppError::service_unavailable("database")));

        let updated = manager(providers, clients)
            .update_request_status(provider_id, Uuid::new_v4(), "in-progress")
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::InProgress);
    }

    #[tokio::test]
    async fn stats_tally_requests_and_ratings() {
        let p = provider("user-1");
        let id = p.id;
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        providers.expect_list_requests().returning(|pid| {
            Ok(vec![
                request(pid, RequestStatus::Pending),
                request(pid, RequestStatus::Completed),
                request(pid, RequestStatus::Completed),
            ])
        });
        providers
            .expect_list_ratings()
            .returning(|pid| Ok(vec![rating(pid, 4), rating(pid, 5)]));

        let stats = manager(providers, MockClientRepository::new())
            .provider_stats(id)
            .await
            .unwrap();

        assert_eq!(stats.requests.total_requests, 3);
        assert_eq!(stats.requests.pending, 1);
        assert_eq!(stats.requests.completed, 2);
        assert_eq!(stats.average_rating, 4.5);
        assert_eq!(stats.total_ratings, 2);
    }
}
