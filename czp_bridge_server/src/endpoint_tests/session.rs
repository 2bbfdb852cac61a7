use actix_web::{cookie::Cookie, http::StatusCode, test, test::TestRequest, App};
use czp_bridge_engine::{traits::SessionManagement, SessionId};
use serde_json::Value;

use super::{
    helpers::{configure_app, fresh_store, test_profile},
    mocks::{MockGateway, MockMirror},
};
use crate::auth::SESSION_COOKIE;

#[actix_web::test]
async fn get_user_data_without_a_cookie_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let app = test::init_service(App::new().configure(configure_app(
        MockGateway::new(),
        MockGateway::new(),
        MockMirror::new(),
        fresh_store(),
    )))
    .await;
    let req = TestRequest::get().uri("/api/get-user-data").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "no-active-session");
}

#[actix_web::test]
async fn get_user_data_with_an_unknown_cookie_is_unauthorized() {
    let app = test::init_service(App::new().configure(configure_app(
        MockGateway::new(),
        MockGateway::new(),
        MockMirror::new(),
        fresh_store(),
    )))
    .await;
    let req = TestRequest::get()
        .uri("/api/get-user-data")
        .cookie(Cookie::new(SESSION_COOKIE, SessionId::random().to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_without_a_session_still_succeeds() {
    let app = test::init_service(App::new().configure(configure_app(
        MockGateway::new(),
        MockGateway::new(),
        MockMirror::new(),
        fresh_store(),
    )))
    .await;
    let req = TestRequest::post().uri("/api/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn logout_destroys_the_session_and_expires_the_cookie() {
    let sessions = fresh_store();
    let id = SessionId::random();
    sessions.store_profile(&id, test_profile()).await.unwrap();
    let app = test::init_service(App::new().configure(configure_app(
        MockGateway::new(),
        MockGateway::new(),
        MockMirror::new(),
        sessions.clone(),
    )))
    .await;

    // The session works before the logout...
    let req = TestRequest::get()
        .uri("/api/get-user-data")
        .cookie(Cookie::new(SESSION_COOKIE, id.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::post().uri("/api/logout").cookie(Cookie::new(SESSION_COOKIE, id.to_string())).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let removal = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("logout did not touch the session cookie")
        .into_owned();
    assert!(removal.value().is_empty());

    // ...and is gone afterwards, server-side.
    let req = TestRequest::get()
        .uri("/api/get-user-data")
        .cookie(Cookie::new(SESSION_COOKIE, id.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(sessions.fetch_profile(&id).await.unwrap().is_none());
}
