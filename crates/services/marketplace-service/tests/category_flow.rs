//! Category aggregation against a real (in-memory) database.

mod support;

use support::{category_with_service, new_category, new_provider, new_service, services};
use domain::{ChildMode, NewProviderServiceRequest, NewSubcategory};
use marketplace_lib::service::{ServiceContainer, Services};
use marketplace_lib::types::PaginationParams;
use uuid::Uuid;

use common::AppError;

#[tokio::test]
async fn creating_a_service_indexes_it_in_its_category() {
    let services = services().await;
    let (category_id, service_id) = category_with_service(&services).await;

    let detail = services
        .categories()
        .get_category(category_id, true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(detail.category.service_count, 1);
    assert_eq!(detail.category.service_ids, Some(vec![service_id]));
    let resolved = detail.services.unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, service_id);
}

#[tokio::test]
async fn duplicate_category_name_is_rejected() {
    let services = services().await;
    services
        .categories()
        .create_category(new_category("Plumbing"))
        .await
        .unwrap();

    let err = services
        .categories()
        .create_category(new_category("Plumbing"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DuplicateName(_)));
}

#[tokio::test]
async fn increment_is_idempotent() {
    let services = services().await;
    let (category_id, service_id) = category_with_service(&services).await;
    let categories = services.categories();

    let added = categories
        .increment_service_count(category_id, service_id)
        .await
        .unwrap();
    assert!(!added);

    let detail = categories.get_category(category_id, false).await.unwrap().unwrap();
    assert_eq!(detail.category.service_count, 1);

    assert!(categories
        .decrement_service_count(category_id, service_id)
        .await
        .unwrap());
    assert!(!categories
        .decrement_service_count(category_id, service_id)
        .await
        .unwrap());
}

#[tokio::test]
async fn deleting_a_category_leaves_reportable_orphans() {
    let services = services().await;
    let (category_id, service_id) = category_with_service(&services).await;

    let provider = services
        .providers()
        .create_provider("provider-user".to_string(), new_provider("Ada Cleaners"))
        .await
        .unwrap();
    services
        .providers()
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

    let before = services.categories().deletion_info(category_id).await.unwrap();
    assert_eq!(before.service_count, 1);
    assert!(!before.can_safely_delete);
    assert_eq!(before.affected_service_ids, vec![service_id]);
    assert_eq!(before.affected_provider_ids, vec![provider.id]);
    assert_eq!(before.affected_request_count, 1);

    assert!(services.categories().delete_category(category_id).await.unwrap());

    // The service keeps its dangling category id
    let service = services.catalog().get_service(service_id).await.unwrap().unwrap();
    assert_eq!(service.category_id, category_id);

    let after = services.categories().deletion_info(category_id).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn deletion_info_for_unknown_category_is_not_found() {
    let services = services().await;

    let err = services
        .categories()
        .deletion_info(Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn empty_category_can_be_deleted_safely() {
    let services = services().await;
    let category = services
        .categories()
        .create_category(new_category("Gardening"))
        .await
        .unwrap();

    let info = services.categories().deletion_info(category.id).await.unwrap();

    assert_eq!(info.service_count, 0);
    assert!(info.can_safely_delete);
    assert!(info.affected_provider_ids.is_empty());
}

#[tokio::test]
async fn counts_and_reconcile_repair_index_drift() {
    let services = services().await;
    let (category_id, service_id) = category_with_service(&services).await;
    let categories = services.categories();

    // Drift: drop the ref behind the catalog's back and add a stale one
    categories
        .decrement_service_count(category_id, service_id)
        .await
        .unwrap();
    let stale = Uuid::new_v4();
    categories
        .increment_service_count(category_id, stale)
        .await
        .unwrap();

    let counts = categories.categories_with_counts().await.unwrap();
    let entry = counts
        .iter()
        .find(|c| c.category.id == category_id)
        .unwrap();
    assert_eq!(entry.live_service_count, 1);
    assert_eq!(entry.indexed_service_count, 1);

    let report = categories.reconcile_index().await.unwrap();
    assert_eq!(report.categories_checked, 1);
    assert_eq!(report.refs_added, 1);
    assert_eq!(report.refs_removed, 1);

    let detail = categories.get_category(category_id, false).await.unwrap().unwrap();
    assert_eq!(detail.category.service_ids, Some(vec![service_id]));

    let again = categories.reconcile_index().await.unwrap();
    assert_eq!(again.refs_added + again.refs_removed, 0);
}

#[tokio::test]
async fn embedded_categories_hold_subcategories_not_services() {
    let services = services().await;
    let mut input = new_category("Beauty");
    input.child_mode = Some(ChildMode::Embedded);
    let category = services.categories().create_category(input).await.unwrap();

    let updated = services
        .categories()
        .add_subcategory(
            category.id,
            NewSubcategory {
                name: "Nails".to_string(),
                description: None,
                icon: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.subcategories().map(|s| s.len()), Some(1));

    let err = services
        .catalog()
        .create_service(new_service("Manicure", category.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCategory(_)));
}

/// Category rows, service rows and each category's indexed count
async fn storage_snapshot(services: &Services) -> (usize, u64, Vec<(Uuid, usize)>) {
    let categories = services.categories().list_categories().await.unwrap();
    let total = services
        .catalog()
        .list_services(PaginationParams::default(), Default::default())
        .await
        .unwrap()
        .pagination
        .total;
    let counts = categories.iter().map(|c| (c.id, c.service_count())).collect();
    (categories.len(), total, counts)
}

#[tokio::test]
async fn deletion_info_leaves_storage_untouched() {
    let services = services().await;
    let (category_id, _) = category_with_service(&services).await;
    let other = services
        .categories()
        .create_category(new_category("Plumbing"))
        .await
        .unwrap();
    services
        .catalog()
        .create_service(new_service("Leak repair", other.id))
        .await
        .unwrap();

    let state_before = storage_snapshot(&services).await;
    let first = services.categories().deletion_info(category_id).await.unwrap();
    for _ in 0..4 {
        let again = services.categories().deletion_info(category_id).await.unwrap();
        assert_eq!(again, first);
    }
    let state_after = storage_snapshot(&services).await;

    assert_eq!(state_after, state_before);
    assert_eq!(state_before.0, 2);
    assert_eq!(state_before.1, 2);
}
