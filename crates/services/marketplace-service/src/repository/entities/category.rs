//! Category database entity for SeaORM.

use std::collections::BTreeSet;

use sea_orm::entity::prelude::*;

use common::AppResult;
use domain::{Category, CategoryChildren, ChildMode, Subcategory};

use super::decode_json;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// "embedded" or "referenced"; fixed at creation
    pub child_mode: String,
    /// Ordered subcategory list (empty array for referenced categories)
    pub subcategories: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::category_service_ref::Entity")]
    ServiceRefs,
}

impl Related<super::category_service_ref::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRefs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Assemble the domain entity; `service_ids` is ignored for embedded categories.
    pub fn into_domain(self, service_ids: BTreeSet<Uuid>) -> AppResult<Category> {
        let children = match ChildMode::from(self.child_mode.as_str()) {
            ChildMode::Embedded => {
                let subs: Vec<Subcategory> = decode_json(self.subcategories, "subcategories")?;
                CategoryChildren::Embedded(subs)
            }
            ChildMode::Referenced => CategoryChildren::Referenced(service_ids),
        };

        Ok(Category {
            id: self.id,
            name: self.name,
            description: self.description,
            icon: self.icon,
            children,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
