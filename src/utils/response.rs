use axum::{Json, http::StatusCode};
use serde::Serialize;

/// JSON envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_data(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }

    /// Error constructor that includes structured `data` (e.g. validation errors)
    pub fn error_with_data(message: &str, data: T) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            data: Some(data),
        }
    }
}

/// Result type for handlers; both arms render as an `ApiResponse`.
pub type HandlerResult<T = serde_json::Value> =
    Result<(StatusCode, Json<ApiResponse<T>>), (StatusCode, Json<ApiResponse<T>>)>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope() {
        let body = serde_json::to_value(ApiResponse::success_with_data("OK", json!({ "a": 1 }))).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "OK", "data": { "a": 1 } }));
    }

    #[test]
    fn missing_data_is_omitted() {
        let response: ApiResponse<()> = ApiResponse {
            success: false,
            message: "nope".into(),
            data: None,
        };
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body, json!({ "success": false, "message": "nope" }));
    }
}
