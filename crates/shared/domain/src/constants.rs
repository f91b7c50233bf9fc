//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Categories
// =============================================================================

/// Maximum category name length (after trimming)
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// Maximum category description length
pub const MAX_CATEGORY_DESCRIPTION_LENGTH: usize = 500;

/// Child mode: category references full Service records
pub const CHILD_MODE_REFERENCED: &str = "referenced";

/// Child mode: category embeds its own subcategory list
pub const CHILD_MODE_EMBEDDED: &str = "embedded";

// =============================================================================
// Services
// =============================================================================

/// Maximum service title length
pub const MAX_SERVICE_TITLE_LENGTH: usize = 200;

/// Maximum short description length
pub const MAX_SERVICE_DESCRIPTION_LENGTH: usize = 1000;

/// Maximum percentage charge on top of the base price
pub const MAX_PERCENTAGE_CHARGE: f64 = 100.0;

/// Currencies a service may be priced in
pub const SUPPORTED_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "INR", "NGN", "KES", "CAD", "AUD"];

/// Check if a currency code is supported
pub fn is_supported_currency(code: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&code)
}

// =============================================================================
// Requests & Ratings
// =============================================================================

/// Lowest accepted rating value
pub const MIN_RATING: i32 = 1;

/// Highest accepted rating value
pub const MAX_RATING: i32 = 5;

/// Maximum review text length
pub const MAX_REVIEW_LENGTH: usize = 1000;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid request status values
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

// =============================================================================
// Witnesses
// =============================================================================

/// Identification document types accepted for provider witnesses
pub const VALID_ID_TYPES: &[&str] = &[
    "passport",
    "national-id",
    "drivers-license",
    "voter-id",
    "other",
];

/// Check if a witness id type is valid
pub fn is_valid_id_type(id_type: &str) -> bool {
    VALID_ID_TYPES.contains(&id_type)
}

// =============================================================================
// Validation
// =============================================================================

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: usize = 1;
