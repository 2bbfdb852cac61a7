//! Adapter between the engine's upstream ports and the DGA client.

use czp_bridge_engine::traits::{GatewayError, GovGateway, PushRequest, TokenSource};
use czp_common::{AccessToken, UserProfile};
use dga_tools::{DgaApi, DgaApiError};
use serde_json::Value;

/// Drives [`DgaApi`] through the engine's [`TokenSource`] and [`GovGateway`]
/// ports, folding the client's error taxonomy into [`GatewayError`].
#[derive(Clone)]
pub struct DgaGateway {
    api: DgaApi,
}

impl DgaGateway {
    pub fn new(api: DgaApi) -> Self {
        Self { api }
    }
}

impl TokenSource for DgaGateway {
    async fn fetch_access_token(&self) -> Result<AccessToken, GatewayError> {
        self.api.fetch_access_token().await.map_err(to_gateway_error)
    }
}

impl GovGateway for DgaGateway {
    async fn exchange_mobile_token(
        &self,
        access: &AccessToken,
        app_id: &str,
        m_token: &str,
    ) -> Result<UserProfile, GatewayError> {
        self.api.exchange_mobile_token(access, app_id, m_token).await.map_err(to_gateway_error)
    }

    async fn push_notification(&self, access: &AccessToken, request: PushRequest) -> Result<Value, GatewayError> {
        self.api
            .push_notification(access, &request.user_ids, &request.message, request.send_date_time.as_deref())
            .await
            .map_err(to_gateway_error)
    }
}

fn to_gateway_error(e: DgaApiError) -> GatewayError {
    match e {
        DgaApiError::Unauthorized => GatewayError::Unauthorized,
        DgaApiError::Rejected { code, message } => GatewayError::Rejected { code, message },
        e @ DgaApiError::InvalidTokenResponse => GatewayError::TokenAcquisition(e.to_string()),
        other => GatewayError::Upstream(other.to_string()),
    }
}
