use czp_common::UserProfile;
use thiserror::Error;

use crate::session::SessionId;

#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    #[error("Session backend error: {0}")]
    Backend(String),
}

/// Server-side session storage, keyed by the opaque identifier delivered to
/// the client as a cookie. Implementations must treat expired records as
/// absent.
#[allow(async_fn_in_trait)]
pub trait SessionManagement {
    /// The live profile for the session, if any.
    async fn fetch_profile(&self, id: &SessionId) -> Result<Option<UserProfile>, SessionStoreError>;

    /// Store the profile under the session, replacing any prior profile and
    /// renewing the session's lifetime.
    async fn store_profile(&self, id: &SessionId, profile: UserProfile) -> Result<(), SessionStoreError>;

    /// Remove the session record. Returns `true` when a record existed.
    async fn destroy_session(&self, id: &SessionId) -> Result<bool, SessionStoreError>;

    /// Drop every expired record, returning how many were removed.
    async fn purge_expired(&self) -> Result<usize, SessionStoreError>;
}
