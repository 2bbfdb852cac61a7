//! The interface contracts ("ports") of the bridge core.
//!
//! * [`TokenSource`] and [`GovGateway`] describe the upstream identity and
//!   notification provider. The production implementation is the `DgaApi`
//!   adapter in the server crate; tests substitute mocks.
//! * [`SessionManagement`] is the cookie-keyed server-side session store.
//! * [`UserMirror`] is the best-effort durable sink for citizen profiles,
//!   with insert-or-overwrite semantics keyed by citizen id.

mod gov_gateway;
mod session_management;
mod user_mirror;

pub use gov_gateway::{GatewayError, GovGateway, PushRequest, TokenSource};
pub use session_management::{SessionManagement, SessionStoreError};
pub use user_mirror::{UpsertOutcome, UserMirror, UserMirrorError};
