use std::env;

use chrono::Duration;
use czp_bridge_engine::{DEFAULT_SESSION_TTL_SECS, DEFAULT_TOKEN_FRESHNESS_SECS};
use czp_common::helpers::parse_boolean_flag;
use dga_tools::DgaConfig;
use log::*;

use crate::errors::ServerError;

const DEFAULT_CZP_HOST: &str = "127.0.0.1";
const DEFAULT_CZP_PORT: u16 = 1040;
const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite URL for the user mirror.
    pub database_url: String,
    /// Session lifetime, measured from the last login on that session.
    pub session_ttl: Duration,
    /// How long a fetched access token is served from the cache.
    pub token_freshness: Duration,
    /// When true, the token cache is warmed at startup (best effort).
    pub prefetch_token: bool,
    /// Upstream endpoints and credentials.
    pub dga: DgaConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CZP_HOST.to_string(),
            port: DEFAULT_CZP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            token_freshness: Duration::seconds(DEFAULT_TOKEN_FRESHNESS_SECS),
            prefetch_token: true,
            dga: DgaConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    /// Load the server configuration from the environment.
    ///
    /// Everything has a usable default except the upstream credentials: a
    /// bridge that cannot authenticate against the DGA API is useless, so a
    /// missing credential aborts startup.
    pub fn try_from_env() -> Result<Self, ServerError> {
        let host = env::var("CZP_HOST").ok().unwrap_or_else(|| DEFAULT_CZP_HOST.into());
        let port = env::var("CZP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for CZP_PORT. {e} Using the default, {DEFAULT_CZP_PORT}, instead."
                    );
                    DEFAULT_CZP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CZP_PORT);
        let database_url = env::var("CZP_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!(
                "🪛️ CZP_DATABASE_URL is not set. User records will be mirrored into an in-memory database and lost \
                 on restart."
            );
            DEFAULT_DATABASE_URL.into()
        });
        let session_ttl = seconds_from_env("CZP_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS);
        let token_freshness = seconds_from_env("CZP_TOKEN_FRESHNESS_SECS", DEFAULT_TOKEN_FRESHNESS_SECS);
        let prefetch_token = parse_boolean_flag(env::var("CZP_TOKEN_PREFETCH").ok(), true);
        let dga = DgaConfig::try_from_env().map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
        Ok(Self { host, port, database_url, session_ttl, token_freshness, prefetch_token, dga })
    }
}

fn seconds_from_env(name: &str, default_secs: i64) -> Duration {
    let secs = env::var(name)
        .map_err(|_| info!("🪛️ {name} is not set. Using the default value of {default_secs} seconds."))
        .and_then(|s| {
            s.parse::<i64>().map_err(|e| warn!("🪛️ Invalid configuration value for {name}. {e}"))
        })
        .ok()
        .filter(|secs| {
            let positive = *secs > 0;
            if !positive {
                warn!("🪛️ {name} must be positive. Using the default value of {default_secs} seconds.");
            }
            positive
        })
        .unwrap_or(default_secs);
    Duration::seconds(secs)
}
