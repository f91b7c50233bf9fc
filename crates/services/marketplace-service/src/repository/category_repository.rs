//! Category repository: category rows plus their service id index.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, Unchanged,
};
use uuid::Uuid;

use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use super::entities::category_service_ref::{self, Entity as ServiceRefEntity};
use super::entities::encode_json;
use super::is_unique_violation;
use common::{AppError, AppResult};
use domain::{Category, Subcategory};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Category repository trait for dependency injection.
///
/// The service id index is a set: adding an id twice or removing an absent
/// id is a no-op that reports `false`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find category by ID, with its service id index loaded
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Find category by exact (case-sensitive) name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    /// List all categories ordered by name
    async fn list(&self) -> AppResult<Vec<Category>>;

    /// Insert a new category
    async fn create(&self, category: Category) -> AppResult<Category>;

    /// Persist name, description, icon and embedded subcategories
    async fn update(&self, category: Category) -> AppResult<Category>;

    /// Delete the category row (its index rows cascade); false if absent
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Add a service id to the index; false if it was already present
    async fn add_service_ref(&self, category_id: Uuid, service_id: Uuid) -> AppResult<bool>;

    /// Remove a service id from the index; false if it was absent
    async fn remove_service_ref(&self, category_id: Uuid, service_id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of CategoryRepository
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn service_ids(&self, category_id: Uuid) -> AppResult<BTreeSet<Uuid>> {
        let refs = ServiceRefEntity::find()
            .filter(category_service_ref::Column::CategoryId.eq(category_id))
            .all(&self.db)
            .await?;

        Ok(refs.into_iter().map(|r| r.service_id).collect())
    }

    async fn hydrate(&self, model: Option<category::Model>) -> AppResult<Option<Category>> {
        match model {
            Some(model) => {
                let ids = self.service_ids(model.id).await?;
                Ok(Some(model.into_domain(ids)?))
            }
            None => Ok(None),
        }
    }
}

fn subcategories_json(category: &Category) -> AppResult<serde_json::Value> {
    let subs: &[Subcategory] = category.subcategories().unwrap_or_default();
    encode_json(subs, "subcategories")
}

fn map_write_error(err: DbErr, name: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::DuplicateName(name.to_string())
    } else {
        AppError::from(err)
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let model = CategoryEntity::find_by_id(id).one(&self.db).await?;
        self.hydrate(model).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let model = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        self.hydrate(model).await
    }

    async fn list(&self) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;

        let mut index: HashMap<Uuid, BTreeSet<Uuid>> = HashMap::new();
        for r in ServiceRefEntity::find().all(&self.db).await? {
            index.entry(r.category_id).or_default().insert(r.service_id);
        }

        models
            .into_iter()
            .map(|m| {
                let ids = index.remove(&m.id).unwrap_or_default();
                m.into_domain(ids)
            })
            .collect()
    }

    async fn create(&self, category: Category) -> AppResult<Category> {
        let active_model = ActiveModel {
            id: Set(category.id),
            name: Set(category.name.clone()),
            description: Set(category.description.clone()),
            icon: Set(category.icon.clone()),
            child_mode: Set(category.child_mode().as_str().to_string()),
            subcategories: Set(subcategories_json(&category)?),
            created_at: Set(category.created_at),
            updated_at: Set(category.updated_at),
        };

        active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, &category.name))?;

        Ok(category)
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        // child_mode and created_at are fixed at creation
        let active_model = ActiveModel {
            id: Unchanged(category.id),
            name: Set(category.name.clone()),
            description: Set(category.description.clone()),
            icon: Set(category.icon.clone()),
            child_mode: NotSet,
            subcategories: Set(subcategories_json(&category)?),
            created_at: NotSet,
            updated_at: Set(category.updated_at),
        };

        match active_model.update(&self.db).await {
            Ok(_) => Ok(category),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("Category")),
            Err(e) => Err(map_write_error(e, &category.name)),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        // Index rows go with the category even where FK cascades are off
        ServiceRefEntity::delete_many()
            .filter(category_service_ref::Column::CategoryId.eq(id))
            .exec(&self.db)
            .await?;

        let result = CategoryEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn add_service_ref(&self, category_id: Uuid, service_id: Uuid) -> AppResult<bool> {
        let row = category_service_ref::ActiveModel {
            category_id: Set(category_id),
            service_id: Set(service_id),
            created_at: Set(chrono::Utc::now()),
        };

        let inserted = ServiceRefEntity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    category_service_ref::Column::CategoryId,
                    category_service_ref::Column::ServiceId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(inserted > 0)
    }

    async fn remove_service_ref(&self, category_id: Uuid, service_id: Uuid) -> AppResult<bool> {
        let result = ServiceRefEntity::delete_by_id((category_id, service_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
