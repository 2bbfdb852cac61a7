use czp_common::UserProfile;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum UserMirrorError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The profile carries no citizen identifier, so it cannot be mirrored")]
    MissingCitizenId,
}

impl From<sqlx::Error> for UserMirrorError {
    fn from(e: sqlx::Error) -> Self {
        UserMirrorError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Durable sink for citizen profiles: insert when the citizen is unseen,
/// otherwise overwrite the mutable fields. Callers treat failures as
/// non-fatal; a login must never fail because the mirror is down.
#[allow(async_fn_in_trait)]
pub trait UserMirror {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<UpsertOutcome, UserMirrorError>;
}
