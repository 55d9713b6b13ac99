use axum::{Extension, Json, extract::rejection::JsonRejection, http::StatusCode};
use serde_json::json;

use crate::schemas::{RawSignupInput, SignupResponseSchema};
use crate::utils::response::{ApiResponse, HandlerResult};
use crate::utils::validation::{json_payload, validate_signup};
use crate::validation::{FormValidator, Gender};

pub const SIGNUP_SUCCESS_MESSAGE: &str = "Account created successfully!";
pub const SIGNUP_SUCCESS_DESCRIPTION: &str = "Welcome to our platform. You can now sign in.";

// Handler for form submission
pub async fn signup_handler(
    Extension(validator): Extension<FormValidator>,
    payload: Result<Json<RawSignupInput>, JsonRejection>,
) -> HandlerResult {
    // Read the request body
    let payload = json_payload(payload)?;

    // Validate the incoming payload
    let account = validate_signup(&validator, &payload)?;

    // Passwords never reach the log or the response
    tracing::info!(email = %account.email, "signup accepted");

    // Build the success response
    let data = json!({
        "description": SIGNUP_SUCCESS_DESCRIPTION,
        "account": SignupResponseSchema::from(&account),
    });
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_data(SIGNUP_SUCCESS_MESSAGE, data)),
    ))
}

// Options for the gender select
pub async fn options_handler() -> HandlerResult {
    let genders: Vec<_> = Gender::ALL
        .into_iter()
        .map(|gender| json!({ "value": gender, "label": gender.label() }))
        .collect();
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_data("OK", json!({ "genders": genders }))),
    ))
}
