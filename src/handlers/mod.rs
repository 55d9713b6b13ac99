pub mod field_handler;
pub mod health_handler;
pub mod signup_handler;
