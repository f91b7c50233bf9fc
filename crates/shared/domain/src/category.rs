//! Category domain entity and related types.
//!
//! A category owns its children in exactly one of two shapes, chosen when
//! the category is created:
//!
//! - **referenced**: a back-reference index (set of Service ids). The
//!   service count is the size of that set, never a separate integer.
//! - **embedded**: an ordered list of [`Subcategory`] value objects stored
//!   inside the category itself.
//!
//! The two shapes never share mutation paths.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    CHILD_MODE_EMBEDDED, CHILD_MODE_REFERENCED, MAX_CATEGORY_DESCRIPTION_LENGTH,
    MAX_CATEGORY_NAME_LENGTH, MIN_NAME_LENGTH,
};
use crate::error::{DomainError, DomainResult};
use crate::service::Service;

/// Which kind of children a category owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ChildMode {
    Embedded,
    #[default]
    Referenced,
}

impl ChildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChildMode::Embedded => CHILD_MODE_EMBEDDED,
            ChildMode::Referenced => CHILD_MODE_REFERENCED,
        }
    }
}

impl From<&str> for ChildMode {
    fn from(s: &str) -> Self {
        match s {
            CHILD_MODE_EMBEDDED => ChildMode::Embedded,
            _ => ChildMode::Referenced,
        }
    }
}

impl std::fmt::Display for ChildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named subcategory embedded in a category document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Children owned by a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryChildren {
    Embedded(Vec<Subcategory>),
    Referenced(BTreeSet<Uuid>),
}

impl CategoryChildren {
    /// Empty children for the given mode
    pub fn empty(mode: ChildMode) -> Self {
        match mode {
            ChildMode::Embedded => CategoryChildren::Embedded(Vec::new()),
            ChildMode::Referenced => CategoryChildren::Referenced(BTreeSet::new()),
        }
    }

    pub fn mode(&self) -> ChildMode {
        match self {
            CategoryChildren::Embedded(_) => ChildMode::Embedded,
            CategoryChildren::Referenced(_) => ChildMode::Referenced,
        }
    }
}

/// Category domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub children: CategoryChildren,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new, childless category
    pub fn new(
        id: Uuid,
        name: String,
        description: Option<String>,
        icon: Option<String>,
        mode: ChildMode,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description,
            icon,
            children: CategoryChildren::empty(mode),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn child_mode(&self) -> ChildMode {
        self.children.mode()
    }

    /// Whether services may point at this category
    pub fn accepts_services(&self) -> bool {
        self.child_mode() == ChildMode::Referenced
    }

    /// Number of referenced services, derived from the id set
    pub fn service_count(&self) -> usize {
        match &self.children {
            CategoryChildren::Referenced(ids) => ids.len(),
            CategoryChildren::Embedded(_) => 0,
        }
    }

    pub fn service_ids(&self) -> Option<&BTreeSet<Uuid>> {
        match &self.children {
            CategoryChildren::Referenced(ids) => Some(ids),
            CategoryChildren::Embedded(_) => None,
        }
    }

    pub fn subcategories(&self) -> Option<&[Subcategory]> {
        match &self.children {
            CategoryChildren::Embedded(subs) => Some(subs),
            CategoryChildren::Referenced(_) => None,
        }
    }

    fn subcategories_mut(&mut self) -> DomainResult<&mut Vec<Subcategory>> {
        match &mut self.children {
            CategoryChildren::Embedded(subs) => Ok(subs),
            CategoryChildren::Referenced(_) => Err(DomainError::validation(
                "Category references services and has no embedded subcategories",
            )),
        }
    }

    /// Append a subcategory (embedded mode only)
    pub fn add_subcategory(&mut self, input: NewSubcategory) -> DomainResult<Subcategory> {
        let name = normalize_name(&input.name, "Subcategory name")?;
        let subs = self.subcategories_mut()?;

        if subs.iter().any(|s| s.name == name) {
            return Err(DomainError::conflict(format!("Subcategory '{}'", name)));
        }

        let sub = Subcategory {
            id: Uuid::new_v4(),
            name,
            description: normalize_description(input.description)?,
            icon: input.icon,
        };
        subs.push(sub.clone());
        self.updated_at = Utc::now();
        Ok(sub)
    }

    /// Merge changes into an existing subcategory (embedded mode only)
    pub fn update_subcategory(
        &mut self,
        subcategory_id: Uuid,
        input: UpdateSubcategory,
    ) -> DomainResult<Subcategory> {
        let name = input
            .name
            .as_deref()
            .map(|n| normalize_name(n, "Subcategory name"))
            .transpose()?;
        let description = normalize_description(input.description)?;
        let subs = self.subcategories_mut()?;

        if let Some(ref name) = name {
            if subs.iter().any(|s| s.id != subcategory_id && &s.name == name) {
                return Err(DomainError::conflict(format!("Subcategory '{}'", name)));
            }
        }

        let sub = subs
            .iter_mut()
            .find(|s| s.id == subcategory_id)
            .ok_or_else(|| DomainError::not_found("Subcategory"))?;

        if let Some(name) = name {
            sub.name = name;
        }
        if description.is_some() {
            sub.description = description;
        }
        if input.icon.is_some() {
            sub.icon = input.icon;
        }
        let updated = sub.clone();
        self.updated_at = Utc::now();
        Ok(updated)
    }

    /// Remove a subcategory, preserving the order of the rest (embedded mode only)
    pub fn remove_subcategory(&mut self, subcategory_id: Uuid) -> DomainResult<Subcategory> {
        let subs = self.subcategories_mut()?;
        let index = subs
            .iter()
            .position(|s| s.id == subcategory_id)
            .ok_or_else(|| DomainError::not_found("Subcategory"))?;
        let removed = subs.remove(index);
        self.updated_at = Utc::now();
        Ok(removed)
    }
}

/// Trim a category or subcategory name and check its length.
pub fn normalize_name(name: &str, field: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    let length = trimmed.chars().count();
    if length < MIN_NAME_LENGTH {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    if length > MAX_CATEGORY_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {} characters",
            field, MAX_CATEGORY_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim a description and check its length.
pub fn normalize_description(description: Option<String>) -> DomainResult<Option<String>> {
    let description = description.map(|d| d.trim().to_string());
    if let Some(ref d) = description {
        if d.chars().count() > MAX_CATEGORY_DESCRIPTION_LENGTH {
            return Err(DomainError::validation(format!(
                "Description cannot exceed {} characters",
                MAX_CATEGORY_DESCRIPTION_LENGTH
            )));
        }
    }
    Ok(description)
}

/// Category creation data
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub child_mode: Option<ChildMode>,
}

/// Category partial update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Subcategory creation data
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSubcategory {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Subcategory partial update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubcategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Category response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub child_mode: ChildMode,
    /// Size of the service id set (always 0 for embedded categories)
    pub service_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategories: Option<Vec<Subcategory>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            icon: category.icon.clone(),
            child_mode: category.child_mode(),
            service_count: category.service_count() as u64,
            service_ids: category
                .service_ids()
                .map(|ids| ids.iter().copied().collect()),
            subcategories: category.subcategories().map(|subs| subs.to_vec()),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        CategoryResponse::from(&category)
    }
}

/// Category with its referenced services resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: CategoryResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
}

/// Read-only projection of what deleting a category would orphan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategoryDeletionInfo {
    /// Live number of services whose category id matches
    pub service_count: u64,
    pub affected_service_ids: Vec<Uuid>,
    pub can_safely_delete: bool,
    /// Providers holding requests against the affected services
    pub affected_provider_ids: Vec<Uuid>,
    pub affected_request_count: u64,
}

impl CategoryDeletionInfo {
    /// Build the report from the live service ids and request blast radius
    pub fn new(
        mut affected_service_ids: Vec<Uuid>,
        mut affected_provider_ids: Vec<Uuid>,
        affected_request_count: u64,
    ) -> Self {
        affected_service_ids.sort();
        affected_service_ids.dedup();
        affected_provider_ids.sort();
        affected_provider_ids.dedup();
        Self {
            service_count: affected_service_ids.len() as u64,
            can_safely_delete: affected_service_ids.is_empty(),
            affected_service_ids,
            affected_provider_ids,
            affected_request_count,
        }
    }
}

/// Category paired with counts recomputed from the service rows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    pub category: CategoryResponse,
    pub live_service_count: u64,
    pub indexed_service_count: u64,
    /// False when the id index drifted from the live service rows
    pub in_sync: bool,
}

impl CategoryWithCount {
    pub fn new(category: &Category, live_service_count: u64) -> Self {
        let indexed_service_count = category.service_count() as u64;
        Self {
            category: CategoryResponse::from(category),
            live_service_count,
            indexed_service_count,
            in_sync: category.child_mode() == ChildMode::Embedded
                || indexed_service_count == live_service_count,
        }
    }
}

/// Outcome of rebuilding category indexes from service rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub categories_checked: u64,
    pub refs_added: u64,
    pub refs_removed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded() -> Category {
        Category::new(
            Uuid::new_v4(),
            "Home".to_string(),
            None,
            None,
            ChildMode::Embedded,
        )
    }

    #[test]
    fn service_count_is_set_size() {
        let mut category = Category::new(
            Uuid::new_v4(),
            "Cleaning".to_string(),
            None,
            None,
            ChildMode::Referenced,
        );
        let svc = Uuid::new_v4();
        if let CategoryChildren::Referenced(ids) = &mut category.children {
            ids.insert(svc);
            ids.insert(svc);
        }
        assert_eq!(category.service_count(), 1);
        assert!(category.accepts_services());
    }

    #[test]
    fn embedded_category_keeps_subcategory_order() {
        let mut category = embedded();
        let a = category
            .add_subcategory(NewSubcategory {
                name: "Plumbing".to_string(),
                ..Default::default()
            })
            .unwrap();
        category
            .add_subcategory(NewSubcategory {
                name: "Electrical".to_string(),
                ..Default::default()
            })
            .unwrap();
        category
            .add_subcategory(NewSubcategory {
                name: "Painting".to_string(),
                ..Default::default()
            })
            .unwrap();

        category.remove_subcategory(a.id).unwrap();
        let names: Vec<_> = category
            .subcategories()
            .unwrap()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Electrical", "Painting"]);
        assert_eq!(category.service_count(), 0);
        assert!(!category.accepts_services());
    }

    #[test]
    fn duplicate_subcategory_name_conflicts() {
        let mut category = embedded();
        let input = NewSubcategory {
            name: "Plumbing".to_string(),
            ..Default::default()
        };
        category.add_subcategory(input.clone()).unwrap();
        assert!(matches!(
            category.add_subcategory(input),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn referenced_category_rejects_subcategories() {
        let mut category = Category::new(
            Uuid::new_v4(),
            "Cleaning".to_string(),
            None,
            None,
            ChildMode::Referenced,
        );
        let result = category.add_subcategory(NewSubcategory {
            name: "Windows".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn update_missing_subcategory_is_not_found() {
        let mut category = embedded();
        let result = category.update_subcategory(Uuid::new_v4(), UpdateSubcategory::default());
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn name_is_trimmed_and_bounded() {
        assert_eq!(normalize_name("  Cleaning ", "Name").unwrap(), "Cleaning");
        assert!(normalize_name("   ", "Name").is_err());
        assert_eq!(normalize_name(" x ", "Name").unwrap().len(), MIN_NAME_LENGTH);
        assert!(normalize_name(&"a".repeat(101), "Name").is_err());
        assert!(normalize_name(&"a".repeat(100), "Name").is_ok());
    }

    #[test]
    fn deletion_info_reports_risk() {
        let svc = Uuid::new_v4();
        let info = CategoryDeletionInfo::new(vec![svc, svc], vec![], 0);
        assert_eq!(info.service_count, 1);
        assert_eq!(info.affected_service_ids, vec![svc]);
        assert!(!info.can_safely_delete);

        let empty = CategoryDeletionInfo::new(vec![], vec![], 0);
        assert!(empty.can_safely_delete);
    }
}
