use axum::body::Body;
use axum::http::{Method, Request};
use signup_form::config::{AppConfig, CorsConfig};
use signup_form::create_app;
use tower::util::ServiceExt; // for oneshot

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/signup")
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "Content-Type")
        .body(Body::empty())
        .unwrap()
}

#[test]
fn create_app_smoke() {
    let _router = create_app(&AppConfig::default());
}

#[tokio::test]
async fn cors_preflight_wildcard_allows_origin() {
    let config = AppConfig {
        cors: CorsConfig::AnyOrigin,
        ..AppConfig::default()
    };
    let resp = create_app(&config)
        .oneshot(preflight("http://example.com"))
        .await
        .expect("request failed");
    assert!(resp.status().is_success());
    let allowed = resp
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert_eq!(allowed, "*");
    let methods = resp
        .headers()
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(methods.to_uppercase().contains("POST"));
}

#[tokio::test]
async fn cors_specific_origin_allowed() {
    let config = AppConfig {
        cors: CorsConfig::Origins(vec!["http://allowed.example.com".into()]),
        ..AppConfig::default()
    };
    let resp = create_app(&config)
        .oneshot(preflight("http://allowed.example.com"))
        .await
        .expect("request failed");
    let allowed = resp
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok());
    assert_eq!(allowed, Some("http://allowed.example.com"));
}

#[tokio::test]
async fn cors_other_origin_not_allowed() {
    let config = AppConfig {
        cors: CorsConfig::Origins(vec!["http://allowed.example.com".into()]),
        ..AppConfig::default()
    };
    let resp = create_app(&config)
        .oneshot(preflight("http://evil.example.com"))
        .await
        .expect("request failed");
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn cors_disabled_sends_no_headers() {
    let resp = create_app(&AppConfig::default())
        .oneshot(preflight("http://example.com"))
        .await
        .expect("request failed");
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}
