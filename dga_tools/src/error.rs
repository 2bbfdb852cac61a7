use thiserror::Error;

#[derive(Debug, Error)]
pub enum DgaApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Upstream request failed: {0}")]
    RequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The upstream provider rejected the credentials")]
    Unauthorized,
    #[error("The upstream provider declined the request (code {code}). {message}")]
    Rejected { code: i64, message: String },
    #[error("The token endpoint did not return an access token")]
    InvalidTokenResponse,
    #[error("The upstream response contained no payload")]
    EmptyResponse,
    #[error("Too many recipients for a single push call: {0}")]
    TooManyRecipients(usize),
}
