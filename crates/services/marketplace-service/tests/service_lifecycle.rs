//! Service lifecycle keeps category indexes in step.

mod support;

use common::AppError;
use domain::UpdateService;
use marketplace_lib::service::ServiceContainer;
use marketplace_lib::types::PaginationParams;
use support::{category_with_service, new_category, new_service, services};
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

#[tokio::test]
async fn create_in_missing_category_is_rejected() {
    let services = services().await;

    let err = assert_err!(
        services
            .catalog()
            .create_service(new_service("Window washing", Uuid::new_v4()))
            .await
    );

    assert!(matches!(err, AppError::InvalidCategory(_)));
}

#[tokio::test]
async fn moving_a_service_moves_its_index_entry() {
    let services = services().await;
    let (from, service_id) = category_with_service(&services).await;
    let to = services
        .categories()
        .create_category(new_category("Laundry"))
        .await
        .unwrap()
        .id;

    let moved = services
        .catalog()
        .update_service(
            service_id,
            UpdateService {
                category_id: Some(to),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.category_id, to);

    let categories = services.categories();
    let old = categories.get_category(from, false).await.unwrap().unwrap();
    let new = categories.get_category(to, false).await.unwrap().unwrap();
    assert_eq!(old.category.service_count, 0);
    assert_eq!(new.category.service_ids, Some(vec![service_id]));
}

#[tokio::test]
async fn deleting_a_service_drops_it_from_the_index() {
    let services = services().await;
    let (category_id, service_id) = category_with_service(&services).await;

    assert!(assert_ok!(services.catalog().delete_service(service_id).await));
    assert!(!assert_ok!(services.catalog().delete_service(service_id).await));

    let detail = services
        .categories()
        .get_category(category_id, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.category.service_count, 0);
}

#[tokio::test]
async fn inactive_services_are_hidden_from_category_listing() {
    let services = services().await;
    let (category_id, service_id) = category_with_service(&services).await;
    let catalog = services.catalog();

    let toggled = catalog.toggle_active(service_id).await.unwrap().unwrap();
    assert!(!toggled.is_active);

    assert!(catalog.services_by_category(category_id).await.unwrap().is_empty());
    assert!(catalog.search_services("deep").await.unwrap().is_empty());
}

#[tokio::test]
async fn popular_and_search_see_active_services() {
    let services = services().await;
    let (_, service_id) = category_with_service(&services).await;
    let catalog = services.catalog();

    catalog.toggle_popular(service_id).await.unwrap();

    let popular = catalog.popular_services(10).await.unwrap();
    assert_eq!(popular.len(), 1);
    assert_eq!(popular[0].id, service_id);

    let found = catalog.search_services("CLEANING").await.unwrap();
    assert_eq!(found.len(), 1);

    let err = assert_err!(catalog.search_services("   ").await);
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn listing_is_paginated() {
    let services = services().await;
    let (category_id, _) = category_with_service(&services).await;
    for title in ["Carpet cleaning", "Sofa cleaning"] {
        services
            .catalog()
            .create_service(new_service(title, category_id))
            .await
            .unwrap();
    }

    let page = services
        .catalog()
        .list_services(PaginationParams::new(2, 2), Default::default())
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(!page.pagination.has_next);
    assert!(page.pagination.has_prev);
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let services = services().await;
    category_with_service(&services).await;

    let page = assert_ok!(
        services
            .catalog()
            .list_services(
                PaginationParams {
                    page: u64::MAX,
                    limit: 100,
                },
                Default::default(),
            )
            .await
    );

    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total, 1);
    assert!(!page.pagination.has_next);
}
