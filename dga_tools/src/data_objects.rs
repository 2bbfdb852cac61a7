//! Wire shapes for the DGA API.
//!
//! Field casing here follows the provider's actual contract (`Result` with a
//! capital R on the token endpoint, camelCase everywhere else). Keep every
//! rename in this module so a contract correction is a one-file change.

use czp_common::UserProfile;
use serde::{Deserialize, Serialize};

/// Response of the token endpoint: `{ "Result": "<access token>" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "Result")]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExchangeRequest<'a> {
    #[serde(rename = "appId")]
    pub app_id: &'a str,
    #[serde(rename = "mToken")]
    pub m_token: &'a str,
}

/// Envelope of the mToken exchange response. `messageCode == 200` carries a
/// profile in `result`; any other code is a business rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeOutcome {
    #[serde(rename = "messageCode")]
    pub message_code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushItem<'a> {
    pub message: &'a str,
    #[serde(rename = "userId")]
    pub user_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushPayload<'a> {
    #[serde(rename = "appId")]
    pub app_id: &'a str,
    pub data: Vec<PushItem<'a>>,
    #[serde(rename = "sendDateTime")]
    pub send_date_time: Option<&'a str>,
}
