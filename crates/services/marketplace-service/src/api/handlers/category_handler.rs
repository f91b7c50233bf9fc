//! Category handlers.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::parse_uuid;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::types::{ApiResponse, Created};
use common::{AppError, AppResult};
use domain::{
    CategoryDeletionInfo, CategoryDetail, CategoryResponse, CategoryWithCount, ChildMode,
    CreateCategory, NewSubcategory, ReconcileReport, Service, UpdateCategory, UpdateSubcategory,
};

/// Category creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name must be 1-100 characters"))]
    #[schema(example = "Cleaning")]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub icon: Option<String>,
    /// `referenced` (default) or `embedded`; fixed after creation
    pub child_mode: Option<ChildMode>,
}

impl From<CreateCategoryRequest> for CreateCategory {
    fn from(req: CreateCategoryRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            icon: req.icon,
            child_mode: req.child_mode,
        }
    }
}

/// Category update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl From<UpdateCategoryRequest> for UpdateCategory {
    fn from(req: UpdateCategoryRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            icon: req.icon,
        }
    }
}

/// Subcategory request (create and update share the shape)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubcategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Subcategory name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Category lookup options
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    /// Resolve the referenced services
    #[serde(default)]
    pub include_services: bool,
}

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/stats", get(category_stats))
        .route("/reconcile", post(reconcile_index))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/:id/deletion-info", get(deletion_info))
        .route("/:id/services", get(category_services))
        .route("/:id/subcategories", post(add_subcategory))
        .route(
            "/:id/subcategories/:sub_id",
            put(update_subcategory).delete(remove_subcategory),
        )
}

/// List categories ordered by name
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses((status = 200, description = "All categories", body = [CategoryResponse]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.categories.list_categories().await?;
    Ok(ApiResponse::success(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<Created<CategoryResponse>> {
    let category = state.categories.create_category(payload.into()).await?;
    Ok(Created(CategoryResponse::from(category)))
}

/// Get a category
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID"), CategoryQuery),
    responses(
        (status = 200, description = "Category found", body = CategoryDetail),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<ApiResponse<CategoryDetail>> {
    let id = parse_uuid(&id, "category")?;
    let detail = state
        .categories
        .get_category(id, query.include_services)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;

    Ok(ApiResponse::success(detail))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let id = parse_uuid(&id, "category")?;
    let category = state
        .categories
        .update_category(id, payload.into())
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;

    Ok(ApiResponse::success(CategoryResponse::from(category)))
}

/// Delete a category; its services keep the dangling reference
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = parse_uuid(&id, "category")?;
    if !state.categories.delete_category(id).await? {
        return Err(AppError::not_found("Category"));
    }

    Ok(ApiResponse::message("Category deleted"))
}

/// Report what deleting a category would orphan
#[utoipa::path(
    get,
    path = "/categories/{id}/deletion-info",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deletion impact", body = CategoryDeletionInfo),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Category not found"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn deletion_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CategoryDeletionInfo>> {
    let id = parse_uuid(&id, "category")?;
    let info = state.categories.deletion_info(id).await?;
    Ok(ApiResponse::success(info))
}

/// Categories with live service counts
#[utoipa::path(
    get,
    path = "/categories/stats",
    tag = "Categories",
    responses((status = 200, description = "Counts per category", body = [CategoryWithCount]))
)]
pub async fn category_stats(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryWithCount>>> {
    let stats = state.categories.categories_with_counts().await?;
    Ok(ApiResponse::success(stats))
}

/// Rebuild category indexes from the service rows
#[utoipa::path(
    post,
    path = "/categories/reconcile",
    tag = "Categories",
    responses((status = 200, description = "Reconciliation report", body = ReconcileReport))
)]
pub async fn reconcile_index(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ReconcileReport>> {
    let report = state.categories.reconcile_index().await?;
    let message = format!(
        "{} categories checked, {} refs added, {} refs removed",
        report.categories_checked, report.refs_added, report.refs_removed
    );
    Ok(ApiResponse::with_message(report, message))
}

/// Active services of a category
#[utoipa::path(
    get,
    path = "/categories/{id}/services",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID")),
    responses((status = 200, description = "Active services", body = [Service]))
)]
pub async fn category_services(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<Service>>> {
    let id = parse_uuid(&id, "category")?;
    let services = state.catalog.services_by_category(id).await?;
    Ok(ApiResponse::success(services))
}

/// Append an embedded subcategory
#[utoipa::path(
    post,
    path = "/categories/{id}/subcategories",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID")),
    request_body = SubcategoryRequest,
    responses(
        (status = 201, description = "Subcategory added", body = CategoryResponse),
        (status = 400, description = "Category does not hold subcategories"),
        (status = 409, description = "Subcategory name taken")
    )
)]
pub async fn add_subcategory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<SubcategoryRequest>,
) -> AppResult<Created<CategoryResponse>> {
    let id = parse_uuid(&id, "category")?;
    let name = payload
        .name
        .ok_or_else(|| AppError::validation("Subcategory name is required"))?;

    let category = state
        .categories
        .add_subcategory(
            id,
            NewSubcategory {
                name,
                description: payload.description,
                icon: payload.icon,
            },
        )
        .await?;

    Ok(Created(CategoryResponse::from(category)))
}

/// Update an embedded subcategory
#[utoipa::path(
    put,
    path = "/categories/{id}/subcategories/{sub_id}",
    tag = "Categories",
    params(
        ("id" = String, Path, description = "Category ID"),
        ("sub_id" = String, Path, description = "Subcategory ID")
    ),
    request_body = SubcategoryRequest,
    responses(
        (status = 200, description = "Subcategory updated", body = CategoryResponse),
        (status = 404, description = "Category or subcategory not found")
    )
)]
pub async fn update_subcategory(
    State(state): State<AppState>,
    Path((id, sub_id)): Path<(String, String)>,
    ValidatedJson(payload): ValidatedJson<SubcategoryRequest>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let id = parse_uuid(&id, "category")?;
    let sub_id = parse_uuid(&sub_id, "subcategory")?;

    let category = state
        .categories
        .update_subcategory(
            id,
            sub_id,
            UpdateSubcategory {
                name: payload.name,
                description: payload.description,
                icon: payload.icon,
            },
        )
        .await?;

    Ok(ApiResponse::success(CategoryResponse::from(category)))
}

/// Remove an embedded subcategory
#[utoipa::path(
    delete,
    path = "/categories/{id}/subcategories/{sub_id}",
    tag = "Categories",
    params(
        ("id" = String, Path, description = "Category ID"),
        ("sub_id" = String, Path, description = "Subcategory ID")
    ),
    responses(
        (status = 200, description = "Subcategory removed", body = CategoryResponse),
        (status = 404, description = "Category or subcategory not found")
    )
)]
pub async fn remove_subcategory(
    State(state): State<AppState>,
    Path((id, sub_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let id = parse_uuid(&id, "category")?;
    let sub_id = parse_uuid(&sub_id, "subcategory")?;

    let category = state.categories.remove_subcategory(id, sub_id).await?;
    Ok(ApiResponse::success(CategoryResponse::from(category)))
}
