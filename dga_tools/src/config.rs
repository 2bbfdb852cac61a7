use czp_common::Secret;
use log::*;

use crate::DgaApiError;

const DEFAULT_AUTH_URL: &str = "https://api.egov.go.th/ws/auth/validate";
const DEFAULT_EXCHANGE_URL: &str = "https://api.egov.go.th/ws/czp/deproc";
const DEFAULT_NOTIFY_URL: &str = "https://api.egov.go.th/ws/czp/notification";

#[derive(Debug, Clone, Default)]
pub struct DgaConfig {
    /// The token endpoint. `ConsumerSecret` and `AgentID` are sent as query parameters.
    pub auth_url: String,
    /// The mToken exchange ("deproc") endpoint.
    pub exchange_url: String,
    /// The push notification endpoint.
    pub notify_url: String,
    /// The application identifier stamped on outbound notifications.
    pub app_id: String,
    pub agent_id: String,
    pub consumer_key: Secret<String>,
    pub consumer_secret: Secret<String>,
}

impl DgaConfig {
    /// Load the upstream configuration from the environment.
    ///
    /// The three credentials (`DGA_CONSUMER_KEY`, `DGA_CONSUMER_SECRET`,
    /// `DGA_AGENT_ID`) and `DGA_APP_ID` are required. The endpoint URLs fall
    /// back to the provider's staging endpoints with a warning.
    pub fn try_from_env() -> Result<Self, DgaApiError> {
        let auth_url = url_from_env("DGA_AUTH_URL", DEFAULT_AUTH_URL);
        let exchange_url = url_from_env("DGA_EXCHANGE_URL", DEFAULT_EXCHANGE_URL);
        let notify_url = url_from_env("DGA_NOTIFY_URL", DEFAULT_NOTIFY_URL);
        let app_id = require_env("DGA_APP_ID")?;
        let agent_id = require_env("DGA_AGENT_ID")?;
        let consumer_key = Secret::new(require_env("DGA_CONSUMER_KEY")?);
        let consumer_secret = Secret::new(require_env("DGA_CONSUMER_SECRET")?);
        Ok(Self { auth_url, exchange_url, notify_url, app_id, agent_id, consumer_key, consumer_secret })
    }
}

fn require_env(name: &str) -> Result<String, DgaApiError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DgaApiError::Configuration(format!("{name} is not set. The server cannot talk to the DGA API without it."))),
    }
}

fn url_from_env(name: &str, default: &str) -> String {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| {
        warn!("🔧️ {name} not set, using {default} as default");
        default.to_string()
    })
}
