//! Provider handlers. Every route requires an authenticated caller.

use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::parse_uuid;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_owner, CurrentUser};
use crate::api::AppState;
use crate::types::{ApiResponse, Created};
use common::{AppError, AppResult};
use domain::{
    ClientRating, ContactDetails, CreateProvider, NewClientRating, Provider,
    ProviderServiceRequest, ProviderStats, ProviderSummary, UpdateProvider, Witness,
};

/// Provider profile creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProviderRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Bola Plumbing")]
    pub name: String,
    #[serde(default)]
    pub contact: ContactDetails,
    #[serde(default)]
    pub witnesses: Vec<Witness>,
}

/// Provider profile update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProviderRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub contact: Option<ContactDetails>,
    pub witnesses: Option<Vec<Witness>>,
}

/// Rating left by the calling client
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientRatingRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 1000, message = "Review must be at most 1000 characters"))]
    pub review: Option<String>,
    pub request_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
}

/// Request status change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StatusRequest {
    /// One of pending, in-progress, completed, cancelled
    #[validate(length(min = 1, message = "Status is required"))]
    #[schema(example = "in-progress")]
    pub status: String,
}

/// Create provider routes
pub fn provider_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_provider))
        .route("/me", get(get_my_provider))
        .route(
            "/:id",
            get(get_provider).put(update_provider).delete(delete_provider),
        )
        .route("/:id/rating", get(provider_rating))
        .route("/:id/ratings", get(list_ratings).post(add_rating))
        .route("/:id/requests", get(list_requests))
        .route("/:id/requests/:request_id/status", patch(update_request_status))
        .route("/:id/stats", get(provider_stats))
}

/// Load a provider and check the caller owns it
async fn owned_provider(state: &AppState, raw_id: &str, user: &CurrentUser) -> AppResult<Provider> {
    let id = parse_uuid(raw_id, "provider")?;
    let provider = state
        .providers
        .get_provider(id)
        .await?
        .ok_or_else(|| AppError::not_found("Provider"))?;
    require_owner(&provider.user_id, user)?;
    Ok(provider)
}

/// Create the caller's provider profile
#[utoipa::path(
    post,
    path = "/providers",
    tag = "Providers",
    request_body = CreateProviderRequest,
    responses(
        (status = 201, description = "Provider created", body = Provider),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Profile already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_provider(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateProviderRequest>,
) -> AppResult<Created<Provider>> {
    let provider = state
        .providers
        .create_provider(
            user.user_id,
            CreateProvider {
                name: payload.name,
                contact: payload.contact,
                witnesses: payload.witnesses,
            },
        )
        .await?;

    Ok(Created(provider))
}

/// The caller's provider profile
#[utoipa::path(
    get,
    path = "/providers/me",
    tag = "Providers",
    responses(
        (status = 200, description = "Provider found", body = Provider),
        (status = 404, description = "No provider profile")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_provider(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<Provider>> {
    let provider = state
        .providers
        .get_provider_by_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Provider"))?;

    Ok(ApiResponse::success(provider))
}

/// Get a provider
#[utoipa::path(
    get,
    path = "/providers/{id}",
    tag = "Providers",
    params(("id" = String, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider found", body = Provider),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Provider>> {
    let id = parse_uuid(&id, "provider")?;
    let provider = state
        .providers
        .get_provider(id)
        .await?
        .ok_or_else(|| AppError::not_found("Provider"))?;

    Ok(ApiResponse::success(provider))
}

/// Update the caller's provider profile
#[utoipa::path(
    put,
    path = "/providers/{id}",
    tag = "Providers",
    params(("id" = String, Path, description = "Provider ID")),
    request_body = UpdateProviderRequest,
    responses(
        (status = 200, description = "Provider updated", body = Provider),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_provider(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateProviderRequest>,
) -> AppResult<ApiResponse<Provider>> {
    let provider = owned_provider(&state, &id, &user).await?;
    let provider = state
        .providers
        .update_provider(
            provider.id,
            UpdateProvider {
                name: payload.name,
                contact: payload.contact,
                witnesses: payload.witnesses,
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("Provider"))?;

    Ok(ApiResponse::success(provider))
}

/// Delete the caller's provider profile
#[utoipa::path(
    delete,
    path = "/providers/{id}",
    tag = "Providers",
    params(("id" = String, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider deleted"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_provider(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let provider = owned_provider(&state, &id, &user).await?;
    if !state.providers.delete_provider(provider.id).await? {
        return Err(AppError::not_found("Provider"));
    }

    Ok(ApiResponse::message("Provider deleted"))
}

/// Average rating of a provider
#[utoipa::path(
    get,
    path = "/providers/{id}/rating",
    tag = "Providers",
    params(("id" = String, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Rating summary", body = ProviderSummary),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn provider_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProviderSummary>> {
    let id = parse_uuid(&id, "provider")?;
    let summary = state.providers.provider_summary(id).await?;
    Ok(ApiResponse::success(summary))
}

/// Ratings clients left on a provider
#[utoipa::path(
    get,
    path = "/providers/{id}/ratings",
    tag = "Providers",
    params(("id" = String, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Client ratings", body = [ClientRating]),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<ClientRating>>> {
    let id = parse_uuid(&id, "provider")?;
    let ratings = state.providers.list_client_ratings(id).await?;
    Ok(ApiResponse::success(ratings))
}

/// Rate a provider as the calling client
#[utoipa::path(
    post,
    path = "/providers/{id}/ratings",
    tag = "Providers",
    params(("id" = String, Path, description = "Provider ID")),
    request_body = ClientRatingRequest,
    responses(
        (status = 201, description = "Rating recorded", body = ClientRating),
        (status = 400, description = "Out-of-range rating or self-rating"),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_rating(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ClientRatingRequest>,
) -> AppResult<Created<ClientRating>> {
    let id = parse_uuid(&id, "provider")?;
    let rating = state
        .providers
        .add_client_rating(
            id,
            NewClientRating {
                client_id: user.user_id,
                request_id: payload.request_id,
                service_id: payload.service_id,
                rating: payload.rating,
                review: payload.review,
            },
        )
        .await?;

    Ok(Created(rating))
}

/// Requests received by the caller's provider profile
#[utoipa::path(
    get,
    path = "/providers/{id}/requests",
    tag = "Providers",
    params(("id" = String, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Service requests, newest first", body = [ProviderServiceRequest]),
        (status = 403, description = "Access denied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<ProviderServiceRequest>>> {
    let provider = owned_provider(&state, &id, &user).await?;
    let requests = state.providers.list_service_requests(provider.id).await?;
    Ok(ApiResponse::success(requests))
}

/// Move a received request to a new status
#[utoipa::path(
    patch,
    path = "/providers/{id}/requests/{request_id}/status",
    tag = "Providers",
    params(
        ("id" = String, Path, description = "Provider ID"),
        ("request_id" = String, Path, description = "Request ID")
    ),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ProviderServiceRequest),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already terminal")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_request_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, request_id)): Path<(String, String)>,
    ValidatedJson(payload): ValidatedJson<StatusRequest>,
) -> AppResult<ApiResponse<ProviderServiceRequest>> {
    let provider = owned_provider(&state, &id, &user).await?;
    let request_id = parse_uuid(&request_id, "request")?;

    let request = state
        .providers
        .update_request_status(provider.id, request_id, payload.status.trim())
        .await?;

    Ok(ApiResponse::success(request))
}

/// Request and rating totals for the caller's provider profile
#[utoipa::path(
    get,
    path = "/providers/{id}/stats",
    tag = "Providers",
    params(("id" = String, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider stats", body = ProviderStats),
        (status = 403, description = "Access denied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn provider_stats(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProviderStats>> {
    let provider = owned_provider(&state, &id, &user).await?;
    let stats = state.providers.provider_stats(provider.id).await?;
    Ok(ApiResponse::success(stats))
}
