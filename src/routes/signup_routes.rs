use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::field_handler::field_feedback_handler;
use crate::handlers::signup_handler::{options_handler, signup_handler};

pub fn signup_routes() -> Router {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/signup/fields/{field}", post(field_feedback_handler))
        .route("/signup/options", get(options_handler))
}
