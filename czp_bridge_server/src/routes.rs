//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Every handler is an async fn: each upstream exchange or push is a network
//! call, and a blocking handler would stall the whole worker while it waits.

use actix_web::{get, web, HttpResponse, Responder};
use czp_bridge_engine::{
    traits::{GatewayError, GovGateway, PushRequest, SessionManagement, TokenSource, UserMirror},
    SessionId,
    TokenApi,
};
use czp_common::UserProfile;
use dga_tools::MAX_PUSH_RECIPIENTS;
use log::*;
use serde_json::json;

use crate::{
    auth::{removal_cookie, session_cookie, SessionTicket},
    data_objects::{BatchNotificationParams, JsonResponse, LoginParams, NotificationParams},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Validate  ----------------------------------------------------
route!(validate => Get "/validate" impl TokenSource);
/// Route handler for the validate endpoint
///
/// Hands the caller a currently-valid upstream access token: the cached one
/// while it is fresh, otherwise a newly fetched one.
pub async fn validate<S: TokenSource>(tokens: web::Data<TokenApi<S>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received validate request");
    let token = tokens.get_token().await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token.reveal() })))
}

//----------------------------------------------   Login  ----------------------------------------------------
route!(login => Post "/login" impl GovGateway, SessionManagement, UserMirror);
/// Route handler for the login endpoint
///
/// Exchanges the client's one-time `mToken` (plus `appId`) for a citizen
/// profile and binds that profile to the caller's session, creating the
/// session and its cookie when the request carries none. The profile is also
/// upserted into the durable user mirror, but only as a best effort: the
/// mirror being down never fails a login.
pub async fn login<G, S, M>(
    ticket: SessionTicket,
    params: web::Json<LoginParams>,
    tokens: web::Data<TokenApi<G>>,
    gateway: web::Data<G>,
    sessions: web::Data<S>,
    mirror: web::Data<M>,
) -> Result<HttpResponse, ServerError>
where
    G: GovGateway,
    S: SessionManagement,
    M: UserMirror,
{
    let LoginParams { app_id, m_token } = params.into_inner();
    if app_id.trim().is_empty() || m_token.trim().is_empty() {
        debug!("💻️ Login request is missing appId or mToken");
        return Err(ServerError::MissingFields("appId and mToken are required".to_string()));
    }
    let access = tokens.get_token().await?;
    let profile = gateway.exchange_mobile_token(&access, &app_id, &m_token).await?;
    let session_id = ticket.id.unwrap_or_else(SessionId::random);
    sessions.store_profile(&session_id, profile.clone()).await?;
    debug!("💻️ Stored the citizen profile for session {session_id}");
    match mirror.upsert_user(&profile).await {
        Ok(outcome) => trace!("🗃️ User record mirrored ({outcome:?})"),
        Err(e) => warn!("🗃️ Could not mirror the user record. {e}"),
    }
    Ok(HttpResponse::Ok().cookie(session_cookie(&session_id)).json(json!({ "success": true, "user": profile })))
}

//----------------------------------------------   Session query  ----------------------------------------------------
route!(get_user_data => Get "/get-user-data" impl SessionManagement);
/// Route handler for the get-user-data endpoint
///
/// Echoes the profile established by a previous login on this session. An
/// absent or expired session is an ordinary condition (first visit, cookie
/// aged out) and is reported as 401 without any error logging.
pub async fn get_user_data<S: SessionManagement>(
    ticket: SessionTicket,
    sessions: web::Data<S>,
) -> Result<HttpResponse, ServerError> {
    let profile = fetch_session_profile(&ticket, sessions.get_ref()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

//----------------------------------------------   Notifications  ----------------------------------------------------
route!(notification => Post "/notification" impl GovGateway, SessionManagement);
/// Route handler for the single-recipient notification endpoint
pub async fn notification<G, S>(
    ticket: SessionTicket,
    params: web::Json<NotificationParams>,
    tokens: web::Data<TokenApi<G>>,
    gateway: web::Data<G>,
    sessions: web::Data<S>,
) -> Result<HttpResponse, ServerError>
where
    G: GovGateway,
    S: SessionManagement,
{
    fetch_session_profile(&ticket, sessions.get_ref()).await?;
    let NotificationParams { user_id, message, send_date_time } = params.into_inner();
    if user_id.trim().is_empty() || message.trim().is_empty() {
        debug!("💻️ Notification request is missing userId or message");
        return Err(ServerError::MissingFields("userId and message are required".to_string()));
    }
    let request = PushRequest { user_ids: vec![user_id], message, send_date_time };
    dispatch_push(request, tokens.get_ref(), gateway.get_ref()).await
}

route!(batch_notification => Post "/notifications" impl GovGateway, SessionManagement);
/// Route handler for the batch notification endpoint
///
/// Same contract as `/notification`, with a recipient list instead of a
/// single user id. The upstream accepts at most 1000 recipients per call, so
/// larger batches are refused here without ever reaching the provider.
pub async fn batch_notification<G, S>(
    ticket: SessionTicket,
    params: web::Json<BatchNotificationParams>,
    tokens: web::Data<TokenApi<G>>,
    gateway: web::Data<G>,
    sessions: web::Data<S>,
) -> Result<HttpResponse, ServerError>
where
    G: GovGateway,
    S: SessionManagement,
{
    fetch_session_profile(&ticket, sessions.get_ref()).await?;
    let BatchNotificationParams { user_ids, message, send_date_time } = params.into_inner();
    if user_ids.is_empty() || message.trim().is_empty() {
        debug!("💻️ Batch notification request is missing userIds or message");
        return Err(ServerError::MissingFields("userIds and message are required".to_string()));
    }
    if user_ids.len() > MAX_PUSH_RECIPIENTS {
        debug!("💻️ Batch of {} recipients refused", user_ids.len());
        return Err(ServerError::BatchTooLarge(user_ids.len()));
    }
    let request = PushRequest { user_ids, message, send_date_time };
    dispatch_push(request, tokens.get_ref(), gateway.get_ref()).await
}

//----------------------------------------------   Logout  ----------------------------------------------------
route!(logout => Post "/logout" impl SessionManagement);
/// Route handler for the logout endpoint
///
/// Destroys the server-side session record and expires the session cookie.
/// Idempotent: logging out without an active session still succeeds.
pub async fn logout<S: SessionManagement>(
    ticket: SessionTicket,
    sessions: web::Data<S>,
) -> Result<HttpResponse, ServerError> {
    if let Some(id) = ticket.id {
        let existed = sessions.destroy_session(&id).await?;
        debug!("💻️ Logout for session {id} (record existed: {existed})");
    }
    Ok(HttpResponse::Ok().cookie(removal_cookie()).json(JsonResponse::success("Logout successful.")))
}

//----------------------------------------------   Shared plumbing  ----------------------------------------------------

/// The live profile for the request's session, or [`ServerError::NoActiveSession`].
async fn fetch_session_profile<S: SessionManagement>(
    ticket: &SessionTicket,
    sessions: &S,
) -> Result<UserProfile, ServerError> {
    let Some(id) = ticket.id.as_ref() else {
        trace!("💻️ Request carries no session cookie");
        return Err(ServerError::NoActiveSession);
    };
    match sessions.fetch_profile(id).await? {
        Some(profile) => Ok(profile),
        None => {
            debug!("💻️ No live session for {id}");
            Err(ServerError::NoActiveSession)
        },
    }
}

/// Push one message to the given recipients using a valid access token.
///
/// An unauthorized answer means the provider no longer honors the token we
/// hold, however fresh it looks; the cached token is dropped before the error
/// surfaces so the next dispatch starts with a fresh fetch.
async fn dispatch_push<G: GovGateway>(
    request: PushRequest,
    tokens: &TokenApi<G>,
    gateway: &G,
) -> Result<HttpResponse, ServerError> {
    let access = tokens.get_token().await?;
    match gateway.push_notification(&access, request).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "result": result }))),
        Err(GatewayError::Unauthorized) => {
            warn!("💻️ Upstream rejected the access token; dropping the cached token");
            tokens.invalidate().await;
            Err(GatewayError::Unauthorized.into())
        },
        Err(e) => Err(e.into()),
    }
}
