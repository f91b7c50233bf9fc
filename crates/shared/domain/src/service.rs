//! Service (marketplace offering) domain entity and related types.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    is_supported_currency, MAX_PERCENTAGE_CHARGE, MAX_SERVICE_DESCRIPTION_LENGTH,
    MAX_SERVICE_TITLE_LENGTH, SUPPORTED_CURRENCIES,
};
use crate::error::{DomainError, DomainResult};

/// Named fee charged on top of the base price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdditionalFee {
    pub name: String,
    pub amount: f64,
}

/// Pricing details of a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub base_price: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_charge: Option<f64>,
    #[serde(default)]
    pub additional_fees: Vec<AdditionalFee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Pricing {
    /// Check price bounds and currency; uppercases the currency code.
    pub fn validated(mut self) -> DomainResult<Self> {
        if !self.base_price.is_finite() || self.base_price < 0.0 {
            return Err(DomainError::validation("Base price must be zero or more"));
        }

        self.currency = self.currency.trim().to_uppercase();
        if !is_supported_currency(&self.currency) {
            return Err(DomainError::validation(format!(
                "Currency must be one of: {}",
                SUPPORTED_CURRENCIES.join(", ")
            )));
        }

        if let Some(pct) = self.percentage_charge {
            if !(0.0..=MAX_PERCENTAGE_CHARGE).contains(&pct) {
                return Err(DomainError::validation(
                    "Percentage charge must be between 0 and 100",
                ));
            }
        }

        for fee in &self.additional_fees {
            if fee.name.trim().is_empty() {
                return Err(DomainError::validation("Additional fee name is required"));
            }
            if !fee.amount.is_finite() || fee.amount < 0.0 {
                return Err(DomainError::validation(
                    "Additional fee amount must be zero or more",
                ));
            }
        }

        Ok(self)
    }
}

/// Service domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub category_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub pricing: Pricing,
    pub locations: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub is_active: bool,
    pub popular: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Case-insensitive substring match over title, description and tags
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| t.contains(&needle))
    }

    /// True when the service is offered in at least one of `locations`
    pub fn in_any_location(&self, locations: &[String]) -> bool {
        locations.is_empty()
            || locations.iter().any(|wanted| {
                let wanted = wanted.trim().to_lowercase();
                self.locations.iter().any(|l| l.to_lowercase() == wanted)
            })
    }
}

/// Trim, lowercase and de-duplicate tags.
pub fn normalize_tags<I>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    tags.into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Trim and de-duplicate locations.
pub fn normalize_locations<I>(locations: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    locations
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Trim a service title and check its length.
pub fn normalize_title(title: &str) -> DomainResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Title is required"));
    }
    if trimmed.chars().count() > MAX_SERVICE_TITLE_LENGTH {
        return Err(DomainError::validation(format!(
            "Title cannot exceed {} characters",
            MAX_SERVICE_TITLE_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim a short description and check its length.
pub fn normalize_service_description(description: &str) -> DomainResult<String> {
    let trimmed = description.trim();
    if trimmed.chars().count() > MAX_SERVICE_DESCRIPTION_LENGTH {
        return Err(DomainError::validation(format!(
            "Description cannot exceed {} characters",
            MAX_SERVICE_DESCRIPTION_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Service creation data
#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub category_id: Uuid,
    pub icon: Option<String>,
    pub pricing: Pricing,
    pub locations: Vec<String>,
    pub tags: Vec<String>,
    pub is_active: Option<bool>,
    pub popular: Option<bool>,
}

/// Service partial update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateService {
    pub title: Option<String>,
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

/// Filters for service listing. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceFilters {
    pub category_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub popular: Option<bool>,
    /// Any-match against the service locations
    pub locations: Vec<String>,
    pub search: Option<String>,
    /// Inclusive lower bound on base price
    pub min_price: Option<f64>,
    /// Inclusive upper bound on base price
    pub max_price: Option<f64>,
}

impl ServiceFilters {
    pub fn matches(&self, service: &Service) -> bool {
        if let Some(category_id) = self.category_id {
            if service.category_id != category_id {
                return false;
            }
        }
        if let Some(active) = self.is_active {
            if service.is_active != active {
                return false;
            }
        }
        if let Some(popular) = self.popular {
            if service.popular != popular {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if service.pricing.base_price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if service.pricing.base_price > max {
                return false;
            }
        }
        if let Some(ref query) = self.search {
            if !service.matches_query(query) {
                return false;
            }
        }
        service.in_any_location(&self.locations)
    }
}
