use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use ipnet::IpNet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got `{value}`")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("APP_HOST:APP_PORT must form a valid socket address, got `{0}`")]
    Address(String),
}

/// Which origins may call the API from a browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    #[default]
    Disabled,
    AnyOrigin,
    Origins(Vec<String>),
}

/// Token-bucket settings, per client IP.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    pub rate_per_sec: f64,
    pub burst: f64,
    /// Buckets idle for longer than this are dropped.
    pub bucket_ttl: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            rate_per_sec: 100.0,
            burst: 200.0,
            bucket_ttl: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub trusted_proxies: Vec<IpNet>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3002,
            cors: CorsConfig::default(),
            rate_limit: RateLimitConfig::default(),
            trusted_proxies: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which returns a variable's value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("APP_HOST").unwrap_or(defaults.host);
        let port = parse_var(&lookup, "APP_PORT", "a u16 port number")?.unwrap_or(defaults.port);

        let enable_cors = lookup("ENABLE_CORS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let cors = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(list) if list.trim() == "*" => CorsConfig::AnyOrigin,
            Some(list) => CorsConfig::Origins(
                list.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            None if enable_cors => CorsConfig::AnyOrigin,
            None => CorsConfig::Disabled,
        };

        let rate_per_sec = parse_var::<f64, _>(&lookup, "RATE_LIMIT_RPS", "a positive number")?
            .unwrap_or(defaults.rate_limit.rate_per_sec);
        if !(rate_per_sec.is_finite() && rate_per_sec > 0.0) {
            return Err(invalid("RATE_LIMIT_RPS", "a positive number", rate_per_sec));
        }
        let burst = parse_var::<f64, _>(&lookup, "RATE_LIMIT_BURST", "a number of at least 1")?
            .unwrap_or(rate_per_sec * 2.0);
        if !(burst.is_finite() && burst >= 1.0) {
            return Err(invalid("RATE_LIMIT_BURST", "a number of at least 1", burst));
        }
        let bucket_ttl = parse_var(&lookup, "RATE_LIMIT_BUCKET_TTL_SECS", "a whole number of seconds")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.rate_limit.bucket_ttl);

        let trusted_proxies = lookup("TRUSTED_PROXIES")
            .map(|raw| parse_trusted_proxies(&raw))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            cors,
            rate_limit: RateLimitConfig {
                rate_per_sec,
                burst,
                bucket_ttl,
            },
            trusted_proxies,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Address(addr))
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str, expected: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(name, expected, raw)),
    }
}

fn invalid(name: &'static str, expected: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        expected,
        value: value.to_string(),
    }
}

// Unparseable entries are skipped so one typo does not stop the server.
fn parse_trusted_proxies(raw: &str) -> Vec<IpNet> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match IpNet::from_str(entry) {
            Ok(net) => Some(net),
            Err(e) => {
                tracing::warn!("TRUSTED_PROXIES: ignoring `{}`: {}", entry, e);
                None
            }
        })
        .collect()
}
