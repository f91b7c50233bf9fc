//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{category_handler, client_handler, provider_handler, service_handler};
use crate::types::PaginationMeta;
use domain::{
    AdditionalFee, CategoryDeletionInfo, CategoryDetail, CategoryResponse, CategoryWithCount,
    ChildMode, Client, ClientRating, ClientServiceRequest, ClientStats, ContactDetails, Pricing,
    Provider, ProviderRating, ProviderServiceRequest, ProviderSnapshot, ProviderStats,
    ProviderSummary, ReconcileReport, RequestStatus, Service, StatusBreakdown, Subcategory,
    Witness,
};

/// OpenAPI documentation for the marketplace API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        version = "0.1.0",
        description = "Service marketplace: categories, services, providers and clients"
    ),
    paths(
        // Categories
        category_handler::list_categories,
        category_handler::create_category,
        category_handler::get_category,
        category_handler::update_category,
        category_handler::delete_category,
        category_handler::deletion_info,
        category_handler::category_stats,
        category_handler::reconcile_index,
        category_handler::category_services,
        category_handler::add_subcategory,
        category_handler::update_subcategory,
        category_handler::remove_subcategory,
        // Services
        service_handler::list_services,
        service_handler::create_service,
        service_handler::popular_services,
        service_handler::search_services,
        service_handler::get_service,
        service_handler::update_service,
        service_handler::delete_service,
        service_handler::toggle_active,
        service_handler::toggle_popular,
        // Providers
        provider_handler::create_provider,
        provider_handler::get_my_provider,
        provider_handler::get_provider,
        provider_handler::update_provider,
        provider_handler::delete_provider,
        provider_handler::provider_rating,
        provider_handler::list_ratings,
        provider_handler::add_rating,
        provider_handler::list_requests,
        provider_handler::update_request_status,
        provider_handler::provider_stats,
        // Clients
        client_handler::create_client,
        client_handler::get_my_client,
        client_handler::get_client,
        client_handler::update_client,
        client_handler::delete_client,
        client_handler::request_history,
        client_handler::add_request,
        client_handler::update_request_status,
        client_handler::list_ratings,
        client_handler::add_rating,
        client_handler::client_stats,
    ),
    components(
        schemas(
            // Catalog
            ChildMode,
            Subcategory,
            CategoryResponse,
            CategoryDetail,
            CategoryDeletionInfo,
            CategoryWithCount,
            ReconcileReport,
            Service,
            Pricing,
            AdditionalFee,
            PaginationMeta,
            category_handler::CreateCategoryRequest,
            category_handler::UpdateCategoryRequest,
            category_handler::SubcategoryRequest,
            service_handler::CreateServiceRequest,
            service_handler::UpdateServiceRequest,
            // People
            ContactDetails,
            Witness,
            RequestStatus,
            StatusBreakdown,
            Provider,
            ProviderServiceRequest,
            ClientRating,
            ProviderSummary,
            ProviderStats,
            Client,
            ClientServiceRequest,
            ProviderSnapshot,
            ProviderRating,
            ClientStats,
            provider_handler::CreateProviderRequest,
            provider_handler::UpdateProviderRequest,
            provider_handler::ClientRatingRequest,
            provider_handler::StatusRequest,
            client_handler::CreateClientRequest,
            client_handler::UpdateClientRequest,
            client_handler::ServiceRequestBody,
            client_handler::ProviderRatingRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Categories", description = "Category aggregation and index maintenance"),
        (name = "Services", description = "Service lifecycle and queries"),
        (name = "Providers", description = "Provider profiles, requests and ratings"),
        (name = "Clients", description = "Client profiles, request history and ratings")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HS256 token issued by the identity provider"))
                        .build(),
                ),
            );
        }
    }
}
