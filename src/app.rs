use axum::{
    Extension, Router,
    http::{HeaderValue, Method},
    middleware,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{AppConfig, CorsConfig};
use crate::middlewares::proxy::{TrustedProxies, proxy_middleware};
use crate::middlewares::rate_limiter::rate_limiter;
use crate::validation::FormValidator;

/// Router with every route and middleware, validating against the wall clock.
pub fn create_app(config: &AppConfig) -> Router {
    create_app_with_validator(config, FormValidator::new())
}

/// Same as [`create_app`] with an explicit validator, e.g. one pinned to a date.
pub fn create_app_with_validator(config: &AppConfig, validator: FormValidator) -> Router {
    // Mount routes and share the validator with handlers
    let mut app = Router::new()
        .merge(crate::routes::signup_routes::signup_routes())
        .merge(crate::routes::health_routes::health_routes())
        .layer(Extension(validator));

    // CORS from config, if enabled
    if let Some(cors) = cors_layer(&config.cors) {
        app = app.layer(cors);
    }

    // Rate limiter middleware (per client IP)
    app = app.layer(middleware::from_fn_with_state(config.rate_limit, rate_limiter));

    // Must be outermost (added last) so it runs before the rate limiter and sets the `ClientIp` extension
    app = app.layer(middleware::from_fn_with_state(
        TrustedProxies::new(config.trusted_proxies.clone()),
        proxy_middleware,
    ));

    app
}

fn cors_layer(cors: &CorsConfig) -> Option<CorsLayer> {
    // Allowed origins
    let origin = match cors {
        CorsConfig::Disabled => return None,
        CorsConfig::AnyOrigin => AllowOrigin::any(),
        CorsConfig::Origins(list) => AllowOrigin::list(
            list.iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        ),
    };
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any),
    )
}
