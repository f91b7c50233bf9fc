//! Success envelopes shared by every handler.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Success body: `{ success: true, data?, message? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }
}

impl ApiResponse<()> {
    /// Acknowledgement without a payload (deletes)
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// 201 with the new resource inside the success envelope
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, ApiResponse::success(self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_only_body_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("Category deleted")).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "Category deleted" }));
    }

    #[test]
    fn data_with_message() {
        let body = serde_json::to_value(ApiResponse::with_message(3, "done")).unwrap();
        assert_eq!(body, json!({ "success": true, "data": 3, "message": "done" }));
    }

    #[test]
    fn created_is_201() {
        let response = Created(json!({ "id": 1 })).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
