use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::schemas::RawSignupInput;
use crate::utils::response::{ApiResponse, HandlerResult};
use crate::utils::validation::json_payload;
use crate::validation::{Field, FormValidator};

/// Live feedback for one field while the user is editing it.
///
/// The whole form is posted because `confirmPassword` depends on `password`.
pub async fn field_feedback_handler(
    Extension(validator): Extension<FormValidator>,
    Path(field): Path<String>,
    payload: Result<Json<RawSignupInput>, JsonRejection>,
) -> HandlerResult {
    // Parse the requested field name
    let field: Field = match field.parse() {
        Ok(field) => field,
        Err(e) => {
            let response = ApiResponse::error_with_data("Not Found", json!({ "error": e.to_string() }));
            return Err((StatusCode::NOT_FOUND, Json(response)));
        }
    };

    // Read the request body
    let payload = json_payload(payload)?;

    // Validate the field against the whole form
    let errors = validator.validate_field(&payload, field);
    let data = json!({
        "field": field,
        "valid": errors.is_empty(),
        "errors": errors,
    });
    Ok((StatusCode::OK, Json(ApiResponse::success_with_data("OK", data))))
}
