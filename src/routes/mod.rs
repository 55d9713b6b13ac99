pub mod health_routes;
pub mod signup_routes;
