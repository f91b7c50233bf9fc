//! Client requests, history and ratings against a real database.

mod support;

use common::AppError;
use domain::{NewClientServiceRequest, NewProviderRating, RequestStatus};
use marketplace_lib::service::{ServiceContainer, Services};
use marketplace_lib::types::PaginationParams;
use support::{category_with_service, new_client, new_provider, services};
use uuid::Uuid;

struct World {
    services: Services,
    service_id: Uuid,
    provider_id: Uuid,
    client_id: Uuid,
}

async fn world() -> World {
    let services = services().await;
    let (_, service_id) = category_with_service(&services).await;
    let provider_id = services
        .providers()
        .create_provider("provider-user".to_string(), new_provider("Ada Cleaners"))
        .await
        .unwrap()
        .id;
    let client_id = services
        .clients()
        .create_client("client-user".to_string(), new_client("Bola"))
        .await
        .unwrap()
        .id;

    World {
        services,
        service_id,
        provider_id,
        client_id,
    }
}

#[tokio::test]
async fn request_is_snapshotted_and_copied_to_provider() {
    let w = world().await;

    let entry = w
        .services
        .clients()
        .add_service_request(
            w.client_id,
            NewClientServiceRequest {
                service_id: w.service_id,
                provider_id: w.provider_id,
            },
        )
        .await
        .unwrap();

    assert_eq!(entry.status, RequestStatus::Pending);
    assert_eq!(entry.provider.name, "Ada Cleaners");

    let inbox = w
        .services
        .providers()
        .list_service_requests(w.provider_id)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].request_id, entry.request_id);
    assert_eq!(inbox[0].client_id, "client-user");
}

#[tokio::test]
async fn request_for_unknown_provider_is_not_found() {
    let w = world().await;

    let err = w
        .services
        .clients()
        .add_service_request(
            w.client_id,
            NewClientServiceRequest {
                service_id: w.service_id,
                provider_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn history_filters_by_status_and_pages() {
    let w = world().await;
    let clients = w.services.clients();

    let mut ids = Vec::new();
    for _ in 0..3 {
        let entry = clients
            .add_service_request(
                w.client_id,
                NewClientServiceRequest {
                    service_id: w.service_id,
                    provider_id: w.provider_id,
                },
            )
            .await
            .unwrap();
        ids.push(entry.request_id);
    }
    clients
        .update_request_status(w.client_id, ids[0], "cancelled")
        .await
        .unwrap();

    let pending = clients
        .request_history(w.client_id, PaginationParams::new(1, 10), Some("pending".to_string()))
        .await
        .unwrap();
    assert_eq!(pending.pagination.total, 2);

    let page = clients
        .request_history(w.client_id, PaginationParams::new(2, 2), None)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination.total_pages, 2);

    let err = clients
        .request_history(w.client_id, PaginationParams::default(), Some("bogus".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStatus(_)));

    // The cancellation closes the provider's copy; the rest stay pending
    let inbox = w
        .services
        .providers()
        .list_service_requests(w.provider_id)
        .await
        .unwrap();
    for entry in &inbox {
        let expected = if entry.request_id == ids[0] {
            RequestStatus::Cancelled
        } else {
            RequestStatus::Pending
        };
        assert_eq!(entry.status, expected);
    }
}

#[tokio::test]
async fn provider_rating_is_mirrored_and_counted() {
    let w = world().await;

    w.services
        .clients()
        .add_provider_rating(
            w.client_id,
            NewProviderRating {
                provider_id: w.provider_id,
                service_id: w.service_id,
                rating: 4,
                review: Some("  Tidy work ".to_string()),
            },
        )
        .await
        .unwrap();

    let given = w
        .services
        .clients()
        .list_provider_ratings(w.client_id)
        .await
        .unwrap();
    assert_eq!(given.len(), 1);

    let received = w
        .services
        .providers()
        .list_client_ratings(w.provider_id)
        .await
        .unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].client_id, "client-user");
    assert_eq!(received[0].service_id, Some(w.service_id));

    let stats = w.services.clients().client_stats(w.client_id).await.unwrap();
    assert_eq!(stats.ratings_given, 1);
    assert_eq!(stats.average_rating_given, 4.0);
}

#[tokio::test]
async fn unknown_id_type_is_rejected() {
    let services = services().await;
    let mut input = new_client("Bola");
    input.id_type = Some("library-card".to_string());
    input.id_number = Some("123".to_string());

    let err = services
        .clients()
        .create_client("client-user".to_string(), input)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn history_page_far_past_the_end_is_empty() {
    let w = world().await;
    w.services
        .clients()
        .add_service_request(
            w.client_id,
            NewClientServiceRequest {
                service_id: w.service_id,
                provider_id: w.provider_id,
            },
        )
        .await
        .unwrap();

    let page = w
        .services
        .clients()
        .request_history(
            w.client_id,
            PaginationParams {
                page: u64::MAX,
                limit: 100,
            },
            None,
        )
        .await
        .unwrap();

    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total, 1);
}
