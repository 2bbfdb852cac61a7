use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Body of `POST /api/login`. Both fields are required; they default to empty
/// strings so a missing field is reported through the bridge's own error
/// shape rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginParams {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub m_token: String,
}

/// Body of `POST /api/notification`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationParams {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub message: String,
    /// Provider-defined timestamp string; absent means "deliver now".
    #[serde(default)]
    pub send_date_time: Option<String>,
}

/// Body of `POST /api/notifications` (batch variant, at most 1000 recipients).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchNotificationParams {
    #[serde(default)]
    pub user_ids: Vec<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub send_date_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}
