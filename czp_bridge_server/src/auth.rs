use std::future::{ready, Ready};

use actix_web::{
    cookie::{Cookie, SameSite},
    dev::Payload,
    FromRequest,
    HttpRequest,
};
use czp_bridge_engine::SessionId;

use crate::errors::ServerError;

pub const SESSION_COOKIE: &str = "czp_session";

/// The session identifier presented by the client, if the request carried the
/// session cookie. Extraction never fails; each route decides whether an
/// absent session is an error.
#[derive(Debug, Clone, Default)]
pub struct SessionTicket {
    pub id: Option<SessionId>,
}

impl FromRequest for SessionTicket {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let id = req.cookie(SESSION_COOKIE).map(|cookie| SessionId::from(cookie.value()));
        ready(Ok(SessionTicket { id }))
    }
}

/// The session cookie handed to the client after a login. HttpOnly, so the
/// mini-app's scripts never see the identifier.
pub fn session_cookie(id: &SessionId) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// A removal cookie that makes the client forget its session identifier.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie =
        Cookie::build(SESSION_COOKIE, "").path("/").http_only(true).same_site(SameSite::Lax).finish();
    cookie.make_removal();
    cookie
}
