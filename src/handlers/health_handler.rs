use axum::{Json, http::StatusCode};
use serde_json::json;

use crate::utils::response::{ApiResponse, HandlerResult};

// Liveness check for load balancers
pub async fn health() -> HandlerResult {
    let data = json!({ "status": "ok" });
    Ok((StatusCode::OK, Json(ApiResponse::success_with_data("OK", data))))
}
