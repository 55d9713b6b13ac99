use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use ipnet::IpNet;

/// Extension type to store resolved client IP
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

/// Networks whose forwarding headers are believed.
#[derive(Clone, Debug, Default)]
pub struct TrustedProxies(Arc<Vec<IpNet>>);

impl TrustedProxies {
    pub fn new(nets: Vec<IpNet>) -> Self {
        Self(Arc::new(nets))
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        self.0.iter().any(|net| net.contains(&ip))
    }
}

/// Resolve the client address into a [`ClientIp`] extension.
///
/// Forwarding headers are only read when the TCP peer is a trusted proxy;
/// otherwise the peer address itself is used.
pub async fn proxy_middleware(
    State(trusted): State<TrustedProxies>,
    mut req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let forwarded = match peer {
        Some(ip) if trusted.contains(ip) => forwarded_client_ip(req.headers()),
        _ => None,
    };

    if let Some(ip) = forwarded.or(peer) {
        req.extensions_mut().insert(ClientIp(ip));
    }

    next.run(req).await
}

// Prefer Cloudflare header, then X-Forwarded-For, then X-Real-IP
fn forwarded_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    header("cf-connecting-ip")
        .and_then(|v| v.trim().parse().ok())
        .or_else(|| {
            header("x-forwarded-for")
                .and_then(|v| v.split(',').next())
                .and_then(|v| v.trim().parse().ok())
        })
        .or_else(|| header("x-real-ip").and_then(|v| v.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn header_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("3.3.3.3"));
        assert_eq!(forwarded_client_ip(&headers), Some(IpAddr::from([3, 3, 3, 3])));

        headers.insert("x-forwarded-for", HeaderValue::from_static("2.2.2.2, 10.0.0.1"));
        assert_eq!(forwarded_client_ip(&headers), Some(IpAddr::from([2, 2, 2, 2])));

        headers.insert("cf-connecting-ip", HeaderValue::from_static("1.1.1.1"));
        assert_eq!(forwarded_client_ip(&headers), Some(IpAddr::from([1, 1, 1, 1])));
    }

    #[test]
    fn garbage_headers_fall_through() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("not-an-ip"));
        headers.insert("x-real-ip", HeaderValue::from_static("4.4.4.4"));
        assert_eq!(forwarded_client_ip(&headers), Some(IpAddr::from([4, 4, 4, 4])));
    }

    #[test]
    fn trusted_proxy_membership() {
        let trusted = TrustedProxies::new(vec!["10.0.0.0/8".parse().unwrap()]);
        assert!(trusted.contains(IpAddr::from([10, 1, 2, 3])));
        assert!(!trusted.contains(IpAddr::from([11, 1, 2, 3])));
        assert!(!TrustedProxies::default().contains(IpAddr::from([10, 1, 2, 3])));
    }
}
