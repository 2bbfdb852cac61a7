//! The single-slot access-token cache.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use czp_common::AccessToken;
use log::*;
use tokio::sync::RwLock;

use crate::traits::{GatewayError, TokenSource};

/// How long a fetched token is served from the cache, in seconds (30 minutes).
pub const DEFAULT_TOKEN_FRESHNESS_SECS: i64 = 30 * 60;

struct TokenCacheEntry {
    token: AccessToken,
    expires_at: DateTime<Utc>,
}

/// Hands out a currently-valid access token while keeping upstream auth calls
/// to a minimum.
///
/// One instance serves the whole process. The slot is replaced atomically
/// under a tokio `RwLock`; the fetch itself runs outside the lock, so two
/// concurrent callers racing an expired slot may both fetch. That costs one
/// redundant upstream call and nothing else (the auth endpoint is idempotent).
pub struct TokenApi<S> {
    source: S,
    freshness: Duration,
    slot: Arc<RwLock<Option<TokenCacheEntry>>>,
}

impl<S> TokenApi<S>
where S: TokenSource
{
    pub fn new(source: S, freshness: Duration) -> Self {
        Self { source, freshness, slot: Arc::new(RwLock::new(None)) }
    }

    /// Return the cached token if it is still inside its freshness window,
    /// otherwise fetch a fresh one and replace the slot.
    ///
    /// A failed fetch leaves the slot exactly as it was: an unexpired cached
    /// token keeps being served, while an expired one is never handed out.
    pub async fn get_token(&self) -> Result<AccessToken, GatewayError> {
        {
            let slot = self.slot.read().await;
            if let Some(entry) = slot.as_ref() {
                if Utc::now() < entry.expires_at {
                    trace!("🔑️ Serving the cached access token");
                    return Ok(entry.token.clone());
                }
                trace!("🔑️ Cached access token expired at {}", entry.expires_at);
            }
        }
        let token = self.source.fetch_access_token().await.map_err(|e| match e {
            GatewayError::TokenAcquisition(_) => e,
            other => GatewayError::TokenAcquisition(other.to_string()),
        })?;
        let expires_at = Utc::now() + self.freshness;
        *self.slot.write().await = Some(TokenCacheEntry { token: token.clone(), expires_at });
        debug!("🔑️ Fetched a new access token, fresh until {expires_at}");
        Ok(token)
    }

    /// Drop the cached token immediately. Called when a downstream request
    /// using the token came back unauthorized, so the next [`Self::get_token`]
    /// fetches rather than repeating a doomed request.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        if slot.take().is_some() {
            info!("🔑️ Cached access token invalidated");
        }
    }
}
