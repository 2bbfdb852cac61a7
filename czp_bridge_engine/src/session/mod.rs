//! Session identifiers and the in-memory reference session store.

mod memory;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use memory::{MemorySessionStore, DEFAULT_SESSION_TTL_SECS};

/// The opaque key of a server-side session record. Delivered to the client as
/// a cookie value; carries no information beyond its randomness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// A fresh 128-bit identifier, rendered as 32 hex characters.
    pub fn random() -> Self {
        let bytes: [u8; 16] = rand::thread_rng().gen();
        let mut id = String::with_capacity(32);
        for b in bytes {
            id.push_str(&format!("{b:02x}"));
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
