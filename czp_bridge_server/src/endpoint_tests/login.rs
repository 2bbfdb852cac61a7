use actix_web::{http::StatusCode, test, test::TestRequest, App};
use czp_bridge_engine::traits::{GatewayError, UpsertOutcome, UserMirrorError};
use serde_json::{json, Value};

use super::{
    helpers::{configure_app, fresh_store, test_profile, token_source},
    mocks::{MockGateway, MockMirror},
};
use crate::auth::SESSION_COOKIE;

#[actix_web::test]
async fn login_with_a_missing_m_token_never_reaches_upstream() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_exchange_mobile_token().times(0);
    let app = test::init_service(
        App::new().configure(configure_app(token_source(0), gateway, MockMirror::new(), fresh_store())),
    )
    .await;
    let req = TestRequest::post().uri("/api/login").set_json(json!({ "appId": "APP01" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "bad-request");
}

#[actix_web::test]
async fn login_with_an_empty_app_id_never_reaches_upstream() {
    let mut gateway = MockGateway::new();
    gateway.expect_exchange_mobile_token().times(0);
    let app = test::init_service(
        App::new().configure(configure_app(token_source(0), gateway, MockMirror::new(), fresh_store())),
    )
    .await;
    let req =
        TestRequest::post().uri("/api/login").set_json(json!({ "appId": "  ", "mToken": "M123" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn a_successful_login_binds_the_profile_to_the_session() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway
        .expect_exchange_mobile_token()
        .withf(|access, app_id, m_token| access.reveal() == "T1" && app_id == "APP01" && m_token == "M123")
        .times(1)
        .returning(|_, _, _| Ok(test_profile()));
    let mut mirror = MockMirror::new();
    mirror.expect_upsert_user().times(1).returning(|_| Ok(UpsertOutcome::Inserted));
    let app = test::init_service(
        App::new().configure(configure_app(token_source(1), gateway, mirror, fresh_store())),
    )
    .await;

    let req =
        TestRequest::post().uri("/api/login").set_json(json!({ "appId": "APP01", "mToken": "M123" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("login did not set the session cookie")
        .into_owned();
    assert_eq!(cookie.value().len(), 32);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["citizenId"], "1100200345678");
    assert_eq!(body["user"]["firstName"], "Somchai");

    // The profile comes back verbatim on a later request with the same cookie.
    let req = TestRequest::get().uri("/api/get-user-data").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched, serde_json::to_value(test_profile()).unwrap());
}

#[actix_web::test]
async fn an_upstream_rejection_surfaces_with_its_message() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_exchange_mobile_token()
        .times(1)
        .returning(|_, _, _| Err(GatewayError::Rejected { code: 401, message: "mToken expired".to_string() }));
    let mut mirror = MockMirror::new();
    mirror.expect_upsert_user().times(0);
    let app = test::init_service(
        App::new().configure(configure_app(token_source(1), gateway, mirror, fresh_store())),
    )
    .await;
    let req =
        TestRequest::post().uri("/api/login").set_json(json!({ "appId": "APP01", "mToken": "stale" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "upstream-rejected");
    assert!(body["message"].as_str().unwrap().contains("mToken expired"), "was: {body}");
}

#[actix_web::test]
async fn a_mirror_failure_does_not_fail_the_login() {
    let mut gateway = MockGateway::new();
    gateway.expect_exchange_mobile_token().times(1).returning(|_, _, _| Ok(test_profile()));
    let mut mirror = MockMirror::new();
    mirror
        .expect_upsert_user()
        .times(1)
        .returning(|_| Err(UserMirrorError::DatabaseError("disk full".to_string())));
    let app = test::init_service(
        App::new().configure(configure_app(token_source(1), gateway, mirror, fresh_store())),
    )
    .await;
    let req =
        TestRequest::post().uri("/api/login").set_json(json!({ "appId": "APP01", "mToken": "M123" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn validate_serves_the_cached_token_across_requests() {
    // Two requests, one upstream fetch: the second answer comes from the cache.
    let app = test::init_service(App::new().configure(configure_app(
        token_source(1),
        MockGateway::new(),
        MockMirror::new(),
        fresh_store(),
    )))
    .await;
    for _ in 0..2 {
        let req = TestRequest::get().uri("/api/validate").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["token"], "T1");
    }
}

#[actix_web::test]
async fn validate_reports_a_failed_acquisition() {
    let mut source = MockGateway::new();
    source
        .expect_fetch_access_token()
        .times(1)
        .returning(|| Err(GatewayError::TokenAcquisition("connection refused".to_string())));
    let app = test::init_service(App::new().configure(configure_app(
        source,
        MockGateway::new(),
        MockMirror::new(),
        fresh_store(),
    )))
    .await;
    let req = TestRequest::get().uri("/api/validate").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token-acquisition-failed");
}
