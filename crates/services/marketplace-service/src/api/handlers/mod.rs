//! HTTP request handlers.

use uuid::Uuid;

use common::{AppError, AppResult};

pub mod category_handler;
pub mod client_handler;
pub mod provider_handler;
pub mod service_handler;

pub use category_handler::category_routes;
pub use client_handler::client_routes;
pub use provider_handler::provider_routes;
pub use service_handler::service_routes;

/// Parse a path id, answering 400 for anything that is not a UUID.
pub(crate) fn parse_uuid(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::bad_request(format!("Invalid {} id", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_is_bad_request() {
        let err = parse_uuid("not-a-uuid", "category").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Invalid category id"));
    }

    #[test]
    fn well_formed_id_parses() {
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid(&id.to_string(), "category").unwrap(), id);
    }
}
