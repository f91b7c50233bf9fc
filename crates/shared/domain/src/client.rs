//! Client domain entity, its request history and the ratings it gives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contact::ContactDetails;
use crate::provider::Provider;
use crate::status::{RequestStatus, StatusBreakdown};

/// Client domain entity (1:1 with an external user identity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    /// External identity owning this record
    pub user_id: String,
    pub name: String,
    pub contact: ContactDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Provider name/contact captured when a request is filed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProviderSnapshot {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl From<&Provider> for ProviderSnapshot {
    fn from(provider: &Provider) -> Self {
        Self {
            name: provider.name.clone(),
            contact: provider.contact.primary(),
        }
    }
}

/// Service request as seen by the client who filed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ClientServiceRequest {
    pub request_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub provider_id: Uuid,
    pub provider: ProviderSnapshot,
    pub request_date: DateTime<Utc>,
    pub status: RequestStatus,
    pub updated_at: DateTime<Utc>,
}

/// Data for filing a new request
#[derive(Debug, Clone, Deserialize)]
pub struct NewClientServiceRequest {
    pub service_id: Uuid,
    pub provider_id: Uuid,
}

/// Rating a client gave to a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProviderRating {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub date: DateTime<Utc>,
}

/// Data for rating a provider
#[derive(Debug, Clone, Deserialize)]
pub struct NewProviderRating {
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub rating: i32,
    pub review: Option<String>,
}

/// Client creation data
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub contact: ContactDetails,
    pub location: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
}

/// Client partial update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub contact: Option<ContactDetails>,
    pub location: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
}

/// Aggregate request/rating counts for a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    #[serde(flatten)]
    pub requests: StatusBreakdown,
    pub ratings_given: u64,
    pub average_rating_given: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_prefers_phone_over_email() {
        let now = Utc::now();
        let provider = Provider {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            name: "Bola Plumbing".to_string(),
            contact: ContactDetails {
                email: Some("bola@example.com".to_string()),
                phone: Some("+2348012345678".to_string()),
                address: None,
            },
            witnesses: vec![],
            created_at: now,
            updated_at: now,
        };

        let snapshot = ProviderSnapshot::from(&provider);
        assert_eq!(snapshot.name, "Bola Plumbing");
        assert_eq!(snapshot.contact.as_deref(), Some("+2348012345678"));
    }

    #[test]
    fn stats_serialize_camel_case() {
        let stats = ClientStats {
            requests: StatusBreakdown::default(),
            ratings_given: 2,
            average_rating_given: 4.5,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["ratingsGiven"], 2);
        assert_eq!(json["averageRatingGiven"], 4.5);
        assert_eq!(json["totalRequests"], 0);
    }
}
