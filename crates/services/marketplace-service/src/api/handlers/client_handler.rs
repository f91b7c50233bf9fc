//! Client handlers. Every route requires the caller to own the client profile.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::parse_uuid;
use super::provider_handler::StatusRequest;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_owner, CurrentUser};
use crate::api::AppState;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};
use common::{AppError, AppResult};
use domain::{
    Client, ClientServiceRequest, ClientStats, ContactDetails, CreateClient,
    NewClientServiceRequest, NewProviderRating, ProviderRating, UpdateClient,
};

/// Client profile creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Ngozi Okafor")]
    pub name: String,
    #[serde(default)]
    pub contact: ContactDetails,
    pub location: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
}

/// Client profile update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub contact: Option<ContactDetails>,
    pub location: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
}

/// New service request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestBody {
    pub service_id: Uuid,
    pub provider_id: Uuid,
}

/// Rating the client gives a provider
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRatingRequest {
    pub provider_id: Uuid,
    pub service_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 1000, message = "Review must be at most 1000 characters"))]
    pub review: Option<String>,
}

/// History query
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Only entries with this status
    pub status: Option<String>,
}

/// Create client routes
pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_client))
        .route("/me", get(get_my_client))
        .route(
            "/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/:id/requests", get(request_history).post(add_request))
        .route("/:id/requests/:request_id/status", patch(update_request_status))
        .route("/:id/ratings", get(list_ratings).post(add_rating))
        .route("/:id/stats", get(client_stats))
}

/// Load a client and check the caller owns it
async fn owned_client(state: &AppState, raw_id: &str, user: &CurrentUser) -> AppResult<Client> {
    let id = parse_uuid(raw_id, "client")?;
    let client = state
        .clients
        .get_client(id)
        .await?
        .ok_or_else(|| AppError::not_found("Client"))?;
    require_owner(&client.user_id, user)?;
    Ok(client)
}

/// Create the caller's client profile
#[utoipa::path(
    post,
    path = "/clients",
    tag = "Clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 409, description = "Profile already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_client(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateClientRequest>,
) -> AppResult<Created<Client>> {
    let client = state
        .clients
        .create_client(
            user.user_id,
            CreateClient {
                name: payload.name,
                contact: payload.contact,
                location: payload.location,
                id_type: payload.id_type,
                id_number: payload.id_number,
            },
        )
        .await?;

    Ok(Created(client))
}

/// The caller's client profile
#[utoipa::path(
    get,
    path = "/clients/me",
    tag = "Clients",
    responses(
        (status = 200, description = "Client found", body = Client),
        (status = 404, description = "No client profile")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_client(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<Client>> {
    let client = state
        .clients
        .get_client_by_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Client"))?;

    Ok(ApiResponse::success(client))
}

/// Get the caller's client profile by id
#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client found", body = Client),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Client not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_client(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Client>> {
    let client = owned_client(&state, &id, &user).await?;
    Ok(ApiResponse::success(client))
}

/// Update the caller's client profile
#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = Client),
        (status = 403, description = "Access denied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_client(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateClientRequest>,
) -> AppResult<ApiResponse<Client>> {
    let client = owned_client(&state, &id, &user).await?;
    let client = state
        .clients
        .update_client(
            client.id,
            UpdateClient {
                name: payload.name,
                contact: payload.contact,
                location: payload.location,
                id_type: payload.id_type,
                id_number: payload.id_number,
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("Client"))?;

    Ok(ApiResponse::success(client))
}

/// Delete the caller's client profile
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client deleted"),
        (status = 403, description = "Access denied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let client = owned_client(&state, &id, &user).await?;
    if !state.clients.delete_client(client.id).await? {
        return Err(AppError::not_found("Client"));
    }

    Ok(ApiResponse::message("Client deleted"))
}

/// Page through the caller's request history
#[utoipa::path(
    get,
    path = "/clients/{id}/requests",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID"), HistoryQuery),
    responses(
        (status = 200, description = "One page of history", body = [ClientServiceRequest]),
        (status = 400, description = "Unknown status filter"),
        (status = 403, description = "Access denied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn request_history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Paginated<ClientServiceRequest>> {
    let client = owned_client(&state, &id, &user).await?;
    let defaults = PaginationParams::default();
    let params = PaginationParams::new(
        query.page.unwrap_or(defaults.page),
        query.limit.unwrap_or(defaults.limit),
    );
    let status = query.status.filter(|s| !s.trim().is_empty());

    state
        .clients
        .request_history(client.id, params, status)
        .await
}

/// File a service request
#[utoipa::path(
    post,
    path = "/clients/{id}/requests",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    request_body = ServiceRequestBody,
    responses(
        (status = 201, description = "Request filed", body = ClientServiceRequest),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Service or provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_request(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ServiceRequestBody>,
) -> AppResult<Created<ClientServiceRequest>> {
    let client = owned_client(&state, &id, &user).await?;
    let request = state
        .clients
        .add_service_request(
            client.id,
            NewClientServiceRequest {
                service_id: payload.service_id,
                provider_id: payload.provider_id,
            },
        )
        .await?;

    Ok(Created(request))
}

/// Move one of the caller's requests to a new status
#[utoipa::path(
    patch,
    path = "/clients/{id}/requests/{request_id}/status",
    tag = "Clients",
    params(
        ("id" = String, Path, description = "Client ID"),
        ("request_id" = String, Path, description = "Request ID")
    ),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ClientServiceRequest),
        (status = 400, description = "Unknown status"),
        (status = 409, description = "Request already terminal")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_request_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, request_id)): Path<(String, String)>,
    ValidatedJson(payload): ValidatedJson<StatusRequest>,
) -> AppResult<ApiResponse<ClientServiceRequest>> {
    let client = owned_client(&state, &id, &user).await?;
    let request_id = parse_uuid(&request_id, "request")?;

    let request = state
        .clients
        .update_request_status(client.id, request_id, payload.status.trim())
        .await?;

    Ok(ApiResponse::success(request))
}

/// Ratings the caller gave
#[utoipa::path(
    get,
    path = "/clients/{id}/ratings",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Ratings given", body = [ProviderRating]),
        (status = 403, description = "Access denied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_ratings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<ProviderRating>>> {
    let client = owned_client(&state, &id, &user).await?;
    let ratings = state.clients.list_provider_ratings(client.id).await?;
    Ok(ApiResponse::success(ratings))
}

/// Rate a provider
#[utoipa::path(
    post,
    path = "/clients/{id}/ratings",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    request_body = ProviderRatingRequest,
    responses(
        (status = 201, description = "Rating recorded", body = ProviderRating),
        (status = 400, description = "Out-of-range rating or self-rating"),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_rating(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ProviderRatingRequest>,
) -> AppResult<Created<ProviderRating>> {
    let client = owned_client(&state, &id, &user).await?;
    let rating = state
        .clients
        .add_provider_rating(
            client.id,
            NewProviderRating {
                provider_id: payload.provider_id,
                service_id: payload.service_id,
                rating: payload.rating,
                review: payload.review,
            },
        )
        .await?;

    Ok(Created(rating))
}

/// Request and rating totals for the caller
#[utoipa::path(
    get,
    path = "/clients/{id}/stats",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client stats", body = ClientStats),
        (status = 403, description = "Access denied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn client_stats(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ClientStats>> {
    let client = owned_client(&state, &id, &user).await?;
    let stats = state.clients.client_stats(client.id).await?;
    Ok(ApiResponse::success(stats))
}
