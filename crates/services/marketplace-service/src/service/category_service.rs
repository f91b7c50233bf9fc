//! Category aggregation: category CRUD, the service id index, deletion
//! impact reports and index reconciliation.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::infra::UnitOfWork;
use common::{AppError, AppResult, OptionExt};
use domain::category::{normalize_description, normalize_name};
use domain::{
    Category, CategoryDeletionInfo, CategoryDetail, CategoryResponse, CategoryWithCount,
    CreateCategory, NewSubcategory, ReconcileReport, UpdateCategory, UpdateSubcategory,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Category service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Create a category; the name must be unused (exact match)
    async fn create_category(&self, input: CreateCategory) -> AppResult<Category>;

    /// Get a category, optionally resolving its referenced services
    async fn get_category(&self, id: Uuid, include_services: bool)
        -> AppResult<Option<CategoryDetail>>;

    /// All categories ordered by name
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// Merge a partial update; `None` when the category does not exist
    async fn update_category(&self, id: Uuid, input: UpdateCategory) -> AppResult<Option<Category>>;

    /// Delete the category row only; services keep their category id
    async fn delete_category(&self, id: Uuid) -> AppResult<bool>;

    /// Read-only report of what deleting the category would orphan
    async fn deletion_info(&self, id: Uuid) -> AppResult<CategoryDeletionInfo>;

    /// Every category with its count recomputed from the service rows
    async fn categories_with_counts(&self) -> AppResult<Vec<CategoryWithCount>>;

    /// Add a service id to the category index (set semantics)
    async fn increment_service_count(&self, category_id: Uuid, service_id: Uuid) -> AppResult<bool>;

    /// Remove a service id from the category index (set semantics)
    async fn decrement_service_count(&self, category_id: Uuid, service_id: Uuid) -> AppResult<bool>;

    /// Append an embedded subcategory
    async fn add_subcategory(&self, category_id: Uuid, input: NewSubcategory) -> AppResult<Category>;

    /// Update an embedded subcategory
    async fn update_subcategory(
        &self,
        category_id: Uuid,
        subcategory_id: Uuid,
        input: UpdateSubcategory,
    ) -> AppResult<Category>;

    /// Remove an embedded subcategory
    async fn remove_subcategory(&self, category_id: Uuid, subcategory_id: Uuid)
        -> AppResult<Category>;

    /// Rebuild every referenced category's index from the service rows
    async fn reconcile_index(&self) -> AppResult<ReconcileReport>;
}

/// Concrete implementation of CategoryService using Unit of Work.
pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn require(&self, id: Uuid) -> AppResult<Category> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")
    }

    async fn ensure_name_free(&self, name: &str, except: Option<Uuid>) -> AppResult<()> {
        match self.uow.categories().find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(AppError::DuplicateName(name.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn create_category(&self, input: CreateCategory) -> AppResult<Category> {
        let name = normalize_name(&input.name, "Category name")?;
        let description = normalize_description(input.description)?;
        self.ensure_name_free(&name, None).await?;

        let category = Category::new(
            Uuid::new_v4(),
            name,
            description,
            input.icon,
            input.child_mode.unwrap_or_default(),
        );

        let category = self.uow.categories().create(category).await?;
        tracing::info!(
            category_id = %category.id,
            mode = %category.child_mode(),
            "Category created"
        );
        Ok(category)
    }

    async fn get_category(
        &self,
        id: Uuid,
        include_services: bool,
    ) -> AppResult<Option<CategoryDetail>> {
        let Some(category) = self.uow.categories().find_by_id(id).await? else {
            return Ok(None);
        };

        let services = match (include_services, category.service_ids()) {
            (true, Some(ids)) => Some(
                self.uow
                    .services()
                    .find_by_ids(ids.iter().copied().collect())
                    .await?,
            ),
            _ => None,
        };

        Ok(Some(CategoryDetail {
            category: CategoryResponse::from(category),
            services,
        }))
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list().await
    }

    async fn update_category(&self, id: Uuid, input: UpdateCategory) -> AppResult<Option<Category>> {
        let Some(mut category) = self.uow.categories().find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = input.name.as_deref() {
            let name = normalize_name(name, "Category name")?;
            if name != category.name {
                self.ensure_name_free(&name, Some(id)).await?;
                category.name = name;
            }
        }
        if input.description.is_some() {
            category.description = normalize_description(input.description)?;
        }
        if input.icon.is_some() {
            category.icon = input.icon;
        }
        category.updated_at = chrono::Utc::now();

        self.uow.categories().update(category).await.map(Some)
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<bool> {
        let deleted = self.uow.categories().delete(id).await?;
        if deleted {
            tracing::info!(category_id = %id, "Category deleted");
        }
        Ok(deleted)
    }

    async fn deletion_info(&self, id: Uuid) -> AppResult<CategoryDeletionInfo> {
        let service_ids = self.uow.services().ids_by_category(id).await?;

        // Dangling service references keep a deleted category reportable
        if service_ids.is_empty() && self.uow.categories().find_by_id(id).await?.is_none() {
            return Err(AppError::not_found("Category"));
        }

        let requests = self
            .uow
            .providers()
            .find_requests_by_services(service_ids.clone())
            .await?;
        let provider_ids = requests.iter().map(|r| r.provider_id).collect();

        Ok(CategoryDeletionInfo::new(
            service_ids,
            provider_ids,
            requests.len() as u64,
        ))
    }

    async fn categories_with_counts(&self) -> AppResult<Vec<CategoryWithCount>> {
        let categories = self.uow.categories().list().await?;
        let live: HashMap<Uuid, u64> = self
            .uow
            .services()
            .live_counts()
            .await?
            .into_iter()
            .collect();

        Ok(categories
            .iter()
            .map(|c| CategoryWithCount::new(c, live.get(&c.id).copied().unwrap_or(0)))
            .collect())
    }

    async fn increment_service_count(&self, category_id: Uuid, service_id: Uuid) -> AppResult<bool> {
        let category = self.require(category_id).await?;
        if !category.accepts_services() {
            return Err(AppError::InvalidCategory(format!(
                "category {} holds embedded subcategories",
                category_id
            )));
        }

        self.uow
            .categories()
            .add_service_ref(category_id, service_id)
            .await
    }

    async fn decrement_service_count(&self, category_id: Uuid, service_id: Uuid) -> AppResult<bool> {
        // Nothing is indexed under a missing or embedded category
        self.uow
            .categories()
            .remove_service_ref(category_id, service_id)
            .await
    }

    async fn add_subcategory(&self, category_id: Uuid, input: NewSubcategory) -> AppResult<Category> {
        let mut category = self.require(category_id).await?;
        category.add_subcategory(input)?;
        self.uow.categories().update(category).await
    }

    async fn update_subcategory(
        &self,
        category_id: Uuid,
        subcategory_id: Uuid,
        input: UpdateSubcategory,
    ) -> AppResult<Category> {
        let mut category = self.require(category_id).await?;
        category.update_subcategory(subcategory_id, input)?;
        self.uow.categories().update(category).await
    }

    async fn remove_subcategory(
        &self,
        category_id: Uuid,
        subcategory_id: Uuid,
    ) -> AppResult<Category> {
        let mut category = self.require(category_id).await?;
        category.remove_subcategory(subcategory_id)?;
        self.uow.categories().update(category).await
    }

    async fn reconcile_index(&self) -> AppResult<ReconcileReport> {
        let categories = self.uow.categories().list().await?;

        let mut live: HashMap<Uuid, BTreeSet<Uuid>> = HashMap::new();
        for (service_id, category_id) in self.uow.services().category_links().await? {
            live.entry(category_id).or_default().insert(service_id);
        }

        let repo = self.uow.categories();
        let mut report = ReconcileReport::default();

        for category in &categories {
            let Some(indexed) = category.service_ids() else {
                continue;
            };
            let wanted = live.remove(&category.id).unwrap_or_default();

            for service_id in wanted.difference(indexed) {
                if repo.add_service_ref(category.id, *service_id).await? {
                    report.refs_added += 1;
                }
            }
            for service_id in indexed.difference(&wanted) {
                if repo.remove_service_ref(category.id, *service_id).await? {
                    report.refs_removed += 1;
                }
            }
            report.categories_checked += 1;
        }

        tracing::info!(
            checked = report.categories_checked,
            added = report.refs_added,
            removed = report.refs_removed,
            "Category index reconciled"
        );
        Ok(report)
    }
}
