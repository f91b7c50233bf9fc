//! Contact details value object shared by providers and clients.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContactDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ContactDetails {
    /// Trim every field, dropping blanks.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            email: clean(self.email),
            phone: clean(self.phone),
            address: clean(self.address),
        }
    }

    /// Best single value for reaching the owner (phone, then email)
    pub fn primary(&self) -> Option<String> {
        self.phone.clone().or_else(|| self.email.clone())
    }
}

/// Trim a display name and require it to be non-empty.
pub fn normalize_display_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Name is required"));
    }
    Ok(trimmed.to_string())
}
