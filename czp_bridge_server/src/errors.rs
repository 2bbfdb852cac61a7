use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use czp_bridge_engine::traits::{GatewayError, SessionStoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Invalid request. {0}")]
    MissingFields(String),
    #[error("Too many recipients in one batch: {0}. The upstream accepts at most 1000 per call.")]
    BatchTooLarge(usize),
    #[error("Unauthorized. Please login first or session expired.")]
    NoActiveSession,
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Session storage error. {0}")]
    SessionStore(#[from] SessionStoreError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ServerError {
    /// The stable error tag of the `{success, message, error}` response body.
    fn taxonomy(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "bad-request",
            Self::BatchTooLarge(_) => "batch-too-large",
            Self::NoActiveSession => "no-active-session",
            Self::Gateway(GatewayError::TokenAcquisition(_)) => "token-acquisition-failed",
            Self::Gateway(GatewayError::Unauthorized) => "upstream-unauthorized",
            Self::Gateway(GatewayError::Rejected { .. }) => "upstream-rejected",
            Self::Gateway(GatewayError::Upstream(_)) => "upstream-failure",
            Self::SessionStore(_) => "session-store",
            _ => "internal",
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields(_) | Self::BatchTooLarge(_) => StatusCode::BAD_REQUEST,
            Self::NoActiveSession => StatusCode::UNAUTHORIZED,
            Self::InitializeError(_) |
            Self::ConfigurationError(_) |
            Self::IOError(_) |
            Self::SessionStore(_) |
            Self::Gateway(_) |
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(
            serde_json::json!({
                "success": false,
                "message": self.to_string(),
                "error": self.taxonomy(),
            })
            .to_string(),
        )
    }
}
