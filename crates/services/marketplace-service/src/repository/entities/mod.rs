//! SeaORM entities and JSON column helpers.

pub mod category;
pub mod category_service_ref;
pub mod client;
pub mod client_provider_rating;
pub mod client_service_request;
pub mod provider;
pub mod provider_client_rating;
pub mod provider_service_request;
pub mod service;

use serde::{de::DeserializeOwned, Serialize};

use common::{AppError, AppResult};

/// Decode a JSON column into its value object.
pub(crate) fn decode_json<T: DeserializeOwned>(value: serde_json::Value, column: &str) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::internal(format!("Corrupt {} column: {}", column, e)))
}

/// Encode a value object for a JSON column.
pub(crate) fn encode_json<T: Serialize + ?Sized>(value: &T, column: &str) -> AppResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Cannot encode {} column: {}", column, e)))
}
