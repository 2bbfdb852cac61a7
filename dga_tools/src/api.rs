use std::{sync::Arc, time::Duration};

use czp_common::{AccessToken, UserProfile};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Response,
    StatusCode,
};
use serde_json::Value;

use crate::{
    config::DgaConfig,
    data_objects::{ExchangeOutcome, ExchangeRequest, PushItem, PushPayload, TokenResponse},
    DgaApiError,
};

/// The upstream contract allows at most this many recipients per push call.
pub const MAX_PUSH_RECIPIENTS: usize = 1000;

/// The exchange endpoint reports success with this `messageCode`.
const EXCHANGE_SUCCESS_CODE: i64 = 200;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the DGA identity and notification API.
///
/// Every request carries the static `Consumer-Key` header; calls that act on
/// behalf of the application additionally carry the current access token in
/// the `Token` header.
#[derive(Clone)]
pub struct DgaApi {
    config: DgaConfig,
    client: Arc<Client>,
}

impl DgaApi {
    pub fn new(config: DgaConfig) -> Result<Self, DgaApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.consumer_key.reveal().as_str())
            .map_err(|e| DgaApiError::Initialization(e.to_string()))?;
        headers.insert("Consumer-Key", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DgaApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Obtain a fresh access token from the auth endpoint.
    pub async fn fetch_access_token(&self) -> Result<AccessToken, DgaApiError> {
        trace!("📨️ Requesting a new access token");
        let response = self
            .client
            .get(self.config.auth_url.as_str())
            .query(&[
                ("ConsumerSecret", self.config.consumer_secret.reveal().as_str()),
                ("AgentID", self.config.agent_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DgaApiError::RequestError(e.to_string()))?;
        let response = check_status(response).await?;
        let body = response.json::<TokenResponse>().await.map_err(|e| DgaApiError::JsonError(e.to_string()))?;
        match body.result {
            Some(token) if !token.is_empty() => {
                debug!("📨️ Obtained a new access token");
                Ok(AccessToken::new(token))
            },
            _ => Err(DgaApiError::InvalidTokenResponse),
        }
    }

    /// Resolve a one-time mobile token into a citizen profile ("deproc").
    pub async fn exchange_mobile_token(
        &self,
        access: &AccessToken,
        app_id: &str,
        m_token: &str,
    ) -> Result<UserProfile, DgaApiError> {
        trace!("📨️ Exchanging an mToken for a citizen profile");
        let body = ExchangeRequest { app_id, m_token };
        let response = self
            .client
            .post(self.config.exchange_url.as_str())
            .header("Token", access.reveal())
            .json(&body)
            .send()
            .await
            .map_err(|e| DgaApiError::RequestError(e.to_string()))?;
        let response = check_status(response).await?;
        let outcome = response.json::<ExchangeOutcome>().await.map_err(|e| DgaApiError::JsonError(e.to_string()))?;
        if outcome.message_code == EXCHANGE_SUCCESS_CODE {
            debug!("📨️ mToken exchange succeeded");
            outcome.result.ok_or(DgaApiError::EmptyResponse)
        } else {
            let message = outcome.message.unwrap_or_else(|| "No message supplied".to_string());
            debug!("📨️ mToken exchange declined with code {}. {message}", outcome.message_code);
            Err(DgaApiError::Rejected { code: outcome.message_code, message })
        }
    }

    /// Deliver one message to the given recipients, immediately or at
    /// `send_date_time` (a provider-defined timestamp string, passed through
    /// verbatim). Returns the provider's acknowledgment payload as-is.
    pub async fn push_notification(
        &self,
        access: &AccessToken,
        user_ids: &[String],
        message: &str,
        send_date_time: Option<&str>,
    ) -> Result<Value, DgaApiError> {
        if user_ids.len() > MAX_PUSH_RECIPIENTS {
            return Err(DgaApiError::TooManyRecipients(user_ids.len()));
        }
        trace!("📨️ Pushing a notification to {} recipient(s)", user_ids.len());
        let payload = PushPayload {
            app_id: self.config.app_id.as_str(),
            data: user_ids.iter().map(|u| PushItem { message, user_id: u.as_str() }).collect(),
            send_date_time,
        };
        let response = self
            .client
            .post(self.config.notify_url.as_str())
            .header("Token", access.reveal())
            .json(&payload)
            .send()
            .await
            .map_err(|e| DgaApiError::RequestError(e.to_string()))?;
        let response = check_status(response).await?;
        let ack = response.json::<Value>().await.map_err(|e| DgaApiError::JsonError(e.to_string()))?;
        debug!("📨️ Notification accepted upstream");
        Ok(ack)
    }
}

/// Map HTTP-level failures into the client error taxonomy. 401/403 are
/// reported as [`DgaApiError::Unauthorized`] so callers can drop a cached
/// token that the provider no longer accepts.
async fn check_status(response: Response) -> Result<Response, DgaApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(DgaApiError::Unauthorized);
    }
    let message = response.text().await.map_err(|e| DgaApiError::RequestError(e.to_string()))?;
    Err(DgaApiError::QueryError { status: status.as_u16(), message })
}
