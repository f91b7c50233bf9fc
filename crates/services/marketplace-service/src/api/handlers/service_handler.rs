//! Service (catalog) handlers.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::parse_uuid;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::DEFAULT_POPULAR_LIMIT;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};
use common::{AppError, AppResult};
use domain::{CreateService, Pricing, Service, ServiceFilters, UpdateService};

/// Service creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Deep cleaning")]
    pub title: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    #[serde(default)]
    pub description: String,
    pub long_description: Option<String>,
    pub category_id: Uuid,
    pub icon: Option<String>,
    pub pricing: Pricing,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_active: Option<bool>,
    pub popular: Option<bool>,
}

impl From<CreateServiceRequest> for CreateService {
    fn from(req: CreateServiceRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            long_description: req.long_description,
            category_id: req.category_id,
            icon: req.icon,
            pricing: req.pricing,
            locations: req.locations,
            tags: req.tags,
            is_active: req.is_active,
            popular: req.popular,
        }
    }
}

/// Service partial update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub category_id: Option<Uuid>,
    pub icon: Option<String>,
    pub pricing: Option<Pricing>,
    pub locations: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub popular: Option<bool>,
}

impl From<UpdateServiceRequest> for UpdateService {
    fn from(req: UpdateServiceRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            long_description: req.long_description,
            category_id: req.category_id,
            icon: req.icon,
            pricing: req.pricing,
            locations: req.locations,
            tags: req.tags,
            is_active: req.is_active,
            popular: req.popular,
        }
    }
}

/// Listing query: pagination plus filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category_id: Option<String>,
    pub is_active: Option<bool>,
    pub popular: Option<bool>,
    /// Comma separated; any match
    pub locations: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ServiceListQuery {
    fn into_parts(self) -> AppResult<(PaginationParams, ServiceFilters)> {
        let defaults = PaginationParams::default();
        let params = PaginationParams::new(
            self.page.unwrap_or(defaults.page),
            self.limit.unwrap_or(defaults.limit),
        );

        let category_id = self
            .category_id
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_uuid(raw, "category"))
            .transpose()?;

        let locations = self
            .locations
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let filters = ServiceFilters {
            category_id,
            is_active: self.is_active,
            popular: self.popular,
            locations,
            search: self.search.filter(|s| !s.trim().is_empty()),
            min_price: self.min_price,
            max_price: self.max_price,
        };

        Ok((params, filters))
    }
}

/// Popular services query
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PopularQuery {
    pub limit: Option<u64>,
}

/// Search query
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Create service routes
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/popular", get(popular_services))
        .route("/search", get(search_services))
        .route(
            "/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
        .route("/:id/toggle-active", patch(toggle_active))
        .route("/:id/toggle-popular", patch(toggle_popular))
}

/// List services with filters and pagination
#[utoipa::path(
    get,
    path = "/services",
    tag = "Services",
    params(ServiceListQuery),
    responses(
        (status = 200, description = "One page of services", body = [Service]),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceListQuery>,
) -> AppResult<Paginated<Service>> {
    let (params, filters) = query.into_parts()?;
    state.catalog.list_services(params, filters).await
}

/// Create a service
#[utoipa::path(
    post,
    path = "/services",
    tag = "Services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 400, description = "Validation error or invalid category")
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateServiceRequest>,
) -> AppResult<Created<Service>> {
    let service = state.catalog.create_service(payload.into()).await?;
    Ok(Created(service))
}

/// Active popular services
#[utoipa::path(
    get,
    path = "/services/popular",
    tag = "Services",
    params(PopularQuery),
    responses((status = 200, description = "Popular services", body = [Service]))
)]
pub async fn popular_services(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> AppResult<ApiResponse<Vec<Service>>> {
    let services = state
        .catalog
        .popular_services(query.limit.unwrap_or(DEFAULT_POPULAR_LIMIT))
        .await?;
    Ok(ApiResponse::success(services))
}

/// Free-text search over active services
#[utoipa::path(
    get,
    path = "/services/search",
    tag = "Services",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching services", body = [Service]),
        (status = 400, description = "Empty query")
    )
)]
pub async fn search_services(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<Vec<Service>>> {
    let services = state.catalog.search_services(&query.q).await?;
    Ok(ApiResponse::success(services))
}

/// Get a service
#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service found", body = Service),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Service>> {
    let id = parse_uuid(&id, "service")?;
    let service = state
        .catalog
        .get_service(id)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;

    Ok(ApiResponse::success(service))
}

/// Update a service
#[utoipa::path(
    put,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 400, description = "Validation error or invalid category"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateServiceRequest>,
) -> AppResult<ApiResponse<Service>> {
    let id = parse_uuid(&id, "service")?;
    let service = state
        .catalog
        .update_service(id, payload.into())
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;

    Ok(ApiResponse::success(service))
}

/// Delete a service
#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = parse_uuid(&id, "service")?;
    if !state.catalog.delete_service(id).await? {
        return Err(AppError::not_found("Service"));
    }

    Ok(ApiResponse::message("Service deleted"))
}

/// Flip the active flag
#[utoipa::path(
    patch,
    path = "/services/{id}/toggle-active",
    tag = "Services",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 404, description = "Service not found")
    )
)]
pub async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Service>> {
    let id = parse_uuid(&id, "service")?;
    let service = state
        .catalog
        .toggle_active(id)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;

    Ok(ApiResponse::success(service))
}

/// Flip the popular flag
#[utoipa::path(
    patch,
    path = "/services/{id}/toggle-popular",
    tag = "Services",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 404, description = "Service not found")
    )
)]
pub async fn toggle_popular(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Service>> {
    let id = parse_uuid(&id, "service")?;
    let service = state
        .catalog
        .toggle_popular(id)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;

    Ok(ApiResponse::success(service))
}
