use czp_common::{AccessToken, UserProfile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Could not obtain an access token from the identity provider. {0}")]
    TokenAcquisition(String),
    #[error("The identity provider rejected the access token")]
    Unauthorized,
    #[error("The identity provider declined the request (code {code}). {message}")]
    Rejected { code: i64, message: String },
    #[error("The upstream call failed. {0}")]
    Upstream(String),
}

/// One outbound push: a single message delivered to every listed recipient,
/// immediately or at the provider-defined `send_date_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushRequest {
    pub user_ids: Vec<String>,
    pub message: String,
    pub send_date_time: Option<String>,
}

/// Anything that can produce a fresh upstream access token.
///
/// [`crate::TokenApi`] wraps a `TokenSource` to add the single-slot cache;
/// handlers never call this directly.
#[allow(async_fn_in_trait)]
pub trait TokenSource {
    async fn fetch_access_token(&self) -> Result<AccessToken, GatewayError>;
}

/// The full upstream port: token issuance plus the two calls made on behalf
/// of the application.
#[allow(async_fn_in_trait)]
pub trait GovGateway: TokenSource {
    /// Resolve a one-time mobile token into a citizen profile.
    async fn exchange_mobile_token(
        &self,
        access: &AccessToken,
        app_id: &str,
        m_token: &str,
    ) -> Result<UserProfile, GatewayError>;

    /// Deliver a push request. The acknowledgment payload is provider-defined
    /// and passed through untouched.
    async fn push_notification(
        &self,
        access: &AccessToken,
        request: PushRequest,
    ) -> Result<serde_json::Value, GatewayError>;
}
