//! CZP Bridge Engine
//!
//! The stateful core of the CZP bridge, kept free of any HTTP framework:
//!
//! 1. The upstream, session and storage *ports* ([`mod@traits`]). The server's
//!    route handlers are generic over these, so any backend that implements
//!    them can stand in (including the test doubles).
//! 2. The single-slot access-token cache ([`TokenApi`]), which guarantees
//!    callers a currently-valid token while keeping upstream auth calls to a
//!    minimum.
//! 3. Reference implementations of the ports: the in-memory TTL'd session
//!    store ([`MemorySessionStore`]) and the SQLite user mirror
//!    ([`SqliteUserMirror`]).

pub mod session;
pub mod sqlite;
pub mod token_api;
pub mod traits;

pub use session::{MemorySessionStore, SessionId, DEFAULT_SESSION_TTL_SECS};
pub use sqlite::SqliteUserMirror;
pub use token_api::{TokenApi, DEFAULT_TOKEN_FRESHNESS_SECS};
