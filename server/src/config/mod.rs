use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub mod cors;
pub mod request_id;
pub mod security;

pub use cors::create_cors_layer;
pub use request_id::BookingRequestId;
pub use security::SecurityHeadersLayer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/staynngo";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub reconcile_interval: Duration,
    pub cors_allowed_origins: Option<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Malformed values
    /// fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr =
            parse_or::<_, SocketAddr>(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())
                .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3001)));

        let reconcile_secs = parse_or(
            &lookup,
            "RECONCILE_INTERVAL_SECS",
            Some(DEFAULT_RECONCILE_INTERVAL_SECS),
        )
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_RECONCILE_INTERVAL_SECS);

        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_addr,
            max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                Some(DEFAULT_MAX_CONNECTIONS),
            )
            .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            reconcile_interval: Duration::from_secs(reconcile_secs),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS"),
            production: lookup("RUST_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: Option<T>) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Config: ignoring invalid {}='{}', using default", key, raw);
                default
            }
        },
    }
}
