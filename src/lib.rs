pub mod config;
pub mod handlers;
pub mod middlewares;
pub mod routes;
pub mod schemas;
pub mod utils;
pub mod validation;

pub mod app;

pub use app::{create_app, create_app_with_validator};
pub use validation::{FormValidator, ValidationResult, validate};
