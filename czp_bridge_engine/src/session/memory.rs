use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use czp_common::UserProfile;
use log::*;
use tokio::sync::RwLock;

use crate::{
    session::SessionId,
    traits::{SessionManagement, SessionStoreError},
};

/// How long a session lives after its last write, in seconds (1 hour).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60;

struct SessionRecord {
    profile: UserProfile,
    expires_at: DateTime<Utc>,
}

/// The in-memory implementation of [`SessionManagement`].
///
/// Records expire `ttl` after their last `store_profile`; reads of an expired
/// record report absence even before the expiry worker has swept it away.
/// Clones share the same map, so one instance serves the whole process.
#[derive(Clone)]
pub struct MemorySessionStore {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<SessionId, SessionRecord>>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, sessions: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Number of records currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl SessionManagement for MemorySessionStore {
    async fn fetch_profile(&self, id: &SessionId) -> Result<Option<UserProfile>, SessionStoreError> {
        let sessions = self.sessions.read().await;
        let profile = sessions
            .get(id)
            .filter(|record| Utc::now() < record.expires_at)
            .map(|record| record.profile.clone());
        Ok(profile)
    }

    async fn store_profile(&self, id: &SessionId, profile: UserProfile) -> Result<(), SessionStoreError> {
        let expires_at = Utc::now() + self.ttl;
        let record = SessionRecord { profile, expires_at };
        self.sessions.write().await.insert(id.clone(), record);
        trace!("🗂️ Session {id} lives until {expires_at}");
        Ok(())
    }

    async fn destroy_session(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        let existed = self.sessions.write().await.remove(id).is_some();
        Ok(existed)
    }

    async fn purge_expired(&self) -> Result<usize, SessionStoreError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| now < record.expires_at);
        Ok(before - sessions.len())
    }
}
