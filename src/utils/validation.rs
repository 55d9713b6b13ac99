use axum::{Json, extract::rejection::JsonRejection, http::StatusCode};
use serde_json::{Value, json};

use crate::schemas::{NormalizedSignupInput, RawSignupInput};
use crate::utils::response::ApiResponse;
use crate::validation::{FieldErrors, FormValidator, ValidationResult};

/// Validate a signup payload and return an axum-compatible error tuple on
/// rejection so handlers can `?` it.
pub fn validate_signup(
    validator: &FormValidator,
    payload: &RawSignupInput,
) -> Result<NormalizedSignupInput, (StatusCode, Json<ApiResponse<Value>>)> {
    match validator.validate(payload) {
        ValidationResult::Accepted(input) => Ok(input),
        ValidationResult::Rejected(errors) => {
            tracing::debug!(
                fields = ?errors.fields().map(|f| f.as_str()).collect::<Vec<_>>(),
                "signup rejected"
            );
            Err(rejection_response(&errors))
        }
    }
}

/// Unwrap an extracted JSON body, answering a malformed one with the usual
/// envelope instead of axum's plain-text rejection.
pub fn json_payload<T>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, (StatusCode, Json<ApiResponse<Value>>)> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            let error = rejection.body_text();
            tracing::debug!(%error, "unreadable signup payload");
            let response = ApiResponse::error_with_data("Invalid JSON", json!({ "error": error }));
            Err((rejection.status(), Json(response)))
        }
    }
}

/// `400 Validation error` with `data.errors` mapping field -> [messages].
pub fn rejection_response(errors: &FieldErrors) -> (StatusCode, Json<ApiResponse<Value>>) {
    let response = ApiResponse::error_with_data("Validation error", json!({ "errors": errors }));
    (StatusCode::BAD_REQUEST, Json(response))
}
