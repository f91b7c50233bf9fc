//! Provider requests, ratings and stats against a real database.

mod support;

use common::AppError;
use domain::{NewClientRating, NewClientServiceRequest, NewProviderServiceRequest, RequestStatus};
use marketplace_lib::service::ServiceContainer;
use support::{category_with_service, new_client, new_provider, services};

fn rating(client_id: &str, value: i32) -> NewClientRating {
    NewClientRating {
        client_id: client_id.to_string(),
        request_id: None,
        service_id: None,
        rating: value,
        review: None,
    }
}

#[tokio::test]
async fn status_moves_forward_and_rejects_unknown_values() {
    let services = services().await;
    let (_, service_id) = category_with_service(&services).await;
    let providers = services.providers();
    let provider = providers
        .create_provider("provider-user".to_string(), new_provider("Ada Cleaners"))
        .await
        .unwrap();

    let request = providers
        .add_service_request(
            provider.id,
            NewProviderServiceRequest {
                request_id: None,
                service_id,
                client_id: "client-user".to_string(),
                request_date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);

    let done = providers
        .update_request_status(provider.id, request.request_id, "completed")
        .await
        .unwrap();
    assert_eq!(done.status, RequestStatus::Completed);

    let err = providers
        .update_request_status(provider.id, request.request_id, "bogus")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStatus(_)));

    let err = providers
        .update_request_status(provider.id, request.request_id, "pending")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let stored = providers.list_service_requests(provider.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, RequestStatus::Completed);
}

#[tokio::test]
async fn average_rating_follows_recorded_ratings() {
    let services = services().await;
    let providers = services.providers();
    let provider = providers
        .create_provider("provider-user".to_string(), new_provider("Ada Cleaners"))
        .await
        .unwrap();

    assert_eq!(providers.average_rating(provider.id).await.unwrap(), 0.0);

    for value in [5, 3, 4] {
        providers
            .add_client_rating(provider.id, rating("client-user", value))
            .await
            .unwrap();
    }

    assert_eq!(providers.average_rating(provider.id).await.unwrap(), 4.0);

    let summary = providers.provider_summary(provider.id).await.unwrap();
    assert_eq!(summary.total_ratings, 3);
    assert_eq!(summary.name, "Ada Cleaners");
}

#[tokio::test]
async fn out_of_range_and_self_ratings_are_rejected() {
    let services = services().await;
    let providers = services.providers();
    let provider = providers
        .create_provider("provider-user".to_string(), new_provider("Ada Cleaners"))
        .await
        .unwrap();

    let err = providers
        .add_client_rating(provider.id, rating("client-user", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = providers
        .add_client_rating(provider.id, rating("provider-user", 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SelfRating));

    assert!(providers.list_client_ratings(provider.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn provider_status_update_reaches_client_history() {
    let services = services().await;
    let (_, service_id) = category_with_service(&services).await;
    let provider = services
        .providers()
        .create_provider("provider-user".to_string(), new_provider("Ada Cleaners"))
        .await
        .unwrap();
    let client = services
        .clients()
        .create_client("client-user".to_string(), new_client("Bola"))
        .await
        .unwrap();

    let entry = services
        .clients()
        .add_service_request(
            client.id,
            NewClientServiceRequest {
                service_id,
                provider_id: provider.id,
            },
        )
        .await
        .unwrap();

    services
        .providers()
        .update_request_status(provider.id, entry.request_id, "in-progress")
        .await
        .unwrap();

    let history = services
        .clients()
        .request_history(client.id, Default::default(), None)
        .await
        .unwrap();
    assert_eq!(history.data.len(), 1);
    assert_eq!(history.data[0].status, RequestStatus::InProgress);

    let stats = services.providers().provider_stats(provider.id).await.unwrap();
    assert_eq!(stats.requests.total_requests, 1);
    assert_eq!(stats.requests.in_progress, 1);
}

#[tokio::test]
async fn request_cancelled_by_client_stays_cancelled() {
    let services = services().await;
    let (_, service_id) = category_with_service(&services).await;
    let provider = services
        .providers()
        .create_provider("provider-user".to_string(), new_provider("Ada Cleaners"))
        .await
        .unwrap();
    let client = services
        .clients()
        .create_client("client-user".to_string(), new_client("Bola"))
        .await
        .unwrap();

    let entry = services
        .clients()
        .add_service_request(
            client.id,
            NewClientServiceRequest {
                service_id,
                provider_id: provider.id,
            },
        )
        .await
        .unwrap();

    services
        .clients()
        .update_request_status(client.id, entry.request_id, "cancelled")
        .await
        .unwrap();

    let err = services
        .providers()
        .update_request_status(provider.id, entry.request_id, "in-progress")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let history = services
        .clients()
        .request_history(client.id, Default::default(), None)
        .await
        .unwrap();
    assert_eq!(history.data[0].status, RequestStatus::Cancelled);

    let inbox = services.providers().list_service_requests(provider.id).await.unwrap();
    assert_eq!(inbox[0].status, RequestStatus::Cancelled);
}

#[tokio::test]
async fn provider_completion_does_not_reopen_client_entry() {
    let services = services().await;
    let (_, service_id) = category_with_service(&services).await;
    let provider = services
        .providers()
        .create_provider("provider-user".to_string(), new_provider("Ada Cleaners"))
        .await
        .unwrap();
    let client = services
        .clients()
        .create_client("client-user".to_string(), new_client("Bola"))
        .await
        .unwrap();

    let entry = services
        .clients()
        .add_service_request(
            client.id,
            NewClientServiceRequest {
                service_id,
                provider_id: provider.id,
            },
        )
        .await
        .unwrap();

    services
        .clients()
        .update_request_status(client.id, entry.request_id, "completed")
        .await
        .unwrap();

    // The provider's copy is still open, but the client's entry is final
    services
        .providers()
        .update_request_status(provider.id, entry.request_id, "in-progress")
        .await
        .unwrap();

    let history = services
        .clients()
        .request_history(client.id, Default::default(), None)
        .await
        .unwrap();
    assert_eq!(history.data[0].status, RequestStatus::Completed);
}

#[tokio::test]
async fn second_profile_for_same_user_conflicts() {
    let services = services().await;
    let providers = services.providers();
    providers
        .create_provider("provider-user".to_string(), new_provider("Ada Cleaners"))
        .await
        .unwrap();

    let err = providers
        .create_provider("provider-user".to_string(), new_provider("Ada Again"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}
