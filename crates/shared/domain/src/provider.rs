//! Provider domain entity, its service requests and client ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{is_valid_id_type, VALID_ID_TYPES};
use crate::contact::ContactDetails;
use crate::error::{DomainError, DomainResult};
use crate::status::{RequestStatus, StatusBreakdown};

/// Person vouching for a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Witness {
    pub name: String,
    pub contact: String,
    pub id_type: String,
    pub id_number: String,
    pub relationship: String,
}

impl Witness {
    pub fn validated(self) -> DomainResult<Self> {
        let name = self.name.trim().to_string();
        let contact = self.contact.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Witness name is required"));
        }
        if contact.is_empty() {
            return Err(DomainError::validation("Witness contact is required"));
        }
        if !is_valid_id_type(&self.id_type) {
            return Err(DomainError::validation(format!(
                "Witness id type must be one of: {}",
                VALID_ID_TYPES.join(", ")
            )));
        }
        Ok(Self {
            name,
            contact,
            id_number: self.id_number.trim().to_string(),
            relationship: self.relationship.trim().to_string(),
            ..self
        })
    }
}

/// Provider domain entity (1:1 with an external user identity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: Uuid,
    /// External identity owning this record
    pub user_id: String,
    pub name: String,
    pub contact: ContactDetails,
    pub witnesses: Vec<Witness>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Service request as seen by the provider fulfilling it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProviderServiceRequest {
    pub request_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    /// User id of the requesting client
    pub client_id: String,
    pub request_date: DateTime<Utc>,
    pub status: RequestStatus,
    pub updated_at: DateTime<Utc>,
}

/// Data for appending a request to a provider
#[derive(Debug, Clone, Deserialize)]
pub struct NewProviderServiceRequest {
    /// Reuse an id minted elsewhere (e.g. by the client side); random when absent
    pub request_id: Option<Uuid>,
    pub service_id: Uuid,
    pub client_id: String,
    pub request_date: Option<DateTime<Utc>>,
}

/// Rating left on a provider by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ClientRating {
    pub id: Uuid,
    pub provider_id: Uuid,
    /// User id of the client who rated
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<Uuid>,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub date: DateTime<Utc>,
}

/// Data for appending a client rating
#[derive(Debug, Clone, Deserialize)]
pub struct NewClientRating {
    pub client_id: String,
    pub request_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub rating: i32,
    pub review: Option<String>,
}

/// Provider creation data
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProvider {
    pub name: String,
    pub contact: ContactDetails,
    pub witnesses: Vec<Witness>,
}

/// Provider partial update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProvider {
    pub name: Option<String>,
    pub contact: Option<ContactDetails>,
    pub witnesses: Option<Vec<Witness>>,
}

/// Public view of a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    pub id: Uuid,
    pub name: String,
    pub average_rating: f64,
    pub total_ratings: u64,
}

/// Aggregate request/rating counts for a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProviderStats {
    #[serde(flatten)]
    pub requests: StatusBreakdown,
    pub average_rating: f64,
    pub total_ratings: u64,
}
