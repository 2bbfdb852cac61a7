use actix_web::web;
use czp_bridge_engine::{traits::SessionManagement, MemorySessionStore, TokenApi};
use log::*;
use tokio::task::JoinHandle;

use crate::integrations::DgaGateway;

/// Starts the session expiry worker. Do not await the returned JoinHandle, as it will run indefinitely.
pub fn start_session_expiry_worker(sessions: MemorySessionStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(std::time::Duration::from_secs(60));
        info!("🕰️ Session expiry worker started");
        loop {
            timer.tick().await;
            match sessions.purge_expired().await {
                Ok(0) => trace!("🕰️ No expired sessions to purge"),
                Ok(n) => info!("🕰️ Purged {n} expired session(s)"),
                Err(e) => error!("🕰️ Error purging expired sessions: {e}"),
            }
        }
    })
}

/// Warm the token cache so the first request does not pay for the auth round
/// trip. Best effort: a failure here is logged and otherwise ignored.
pub fn start_token_prefetch(tokens: web::Data<TokenApi<DgaGateway>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokens.get_token().await {
            Ok(_) => info!("🔑️ Access token pre-fetched at startup"),
            Err(e) => warn!("🔑️ Startup token pre-fetch failed; the first request will fetch instead. {e}"),
        }
    })
}
