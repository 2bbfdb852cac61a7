use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use actix_web::{cookie::Cookie, http::StatusCode, test, test::TestRequest, App};
use czp_bridge_engine::{
    traits::{GatewayError, SessionManagement},
    MemorySessionStore,
    SessionId,
};
use serde_json::{json, Value};

use super::{
    helpers::{configure_app, fresh_store, test_profile, token_source},
    mocks::{MockGateway, MockMirror},
};
use crate::auth::SESSION_COOKIE;

async fn seeded_store() -> (MemorySessionStore, SessionId) {
    let sessions = fresh_store();
    let id = SessionId::random();
    sessions.store_profile(&id, test_profile()).await.unwrap();
    (sessions, id)
}

#[actix_web::test]
async fn notification_without_a_session_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_push_notification().times(0);
    let app = test::init_service(
        App::new().configure(configure_app(token_source(0), gateway, MockMirror::new(), fresh_store())),
    )
    .await;
    let req = TestRequest::post()
        .uri("/api/notification")
        .set_json(json!({ "userId": "u-1", "message": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn notification_with_a_missing_message_never_reaches_upstream() {
    let (sessions, id) = seeded_store().await;
    let mut gateway = MockGateway::new();
    gateway.expect_push_notification().times(0);
    let app = test::init_service(
        App::new().configure(configure_app(token_source(0), gateway, MockMirror::new(), sessions)),
    )
    .await;
    let req = TestRequest::post()
        .uri("/api/notification")
        .cookie(Cookie::new(SESSION_COOKIE, id.to_string()))
        .set_json(json!({ "userId": "u-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "bad-request");
}

#[actix_web::test]
async fn a_notification_is_relayed_and_the_ack_passed_through() {
    let (sessions, id) = seeded_store().await;
    let mut gateway = MockGateway::new();
    gateway
        .expect_push_notification()
        .withf(|access, request| {
            access.reveal() == "T1" &&
                request.user_ids == ["u-1"] &&
                request.message == "hello" &&
                request.send_date_time.as_deref() == Some("2026-01-31 09:00:00")
        })
        .times(1)
        .returning(|_, _| Ok(json!({ "code": "success", "queued": 1 })));
    let app = test::init_service(
        App::new().configure(configure_app(token_source(1), gateway, MockMirror::new(), sessions)),
    )
    .await;
    let req = TestRequest::post()
        .uri("/api/notification")
        .cookie(Cookie::new(SESSION_COOKIE, id.to_string()))
        .set_json(json!({ "userId": "u-1", "message": "hello", "sendDateTime": "2026-01-31 09:00:00" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["result"]["queued"], 1);
}

#[actix_web::test]
async fn an_unauthorized_push_invalidates_the_cached_token() {
    let _ = env_logger::try_init().ok();
    let (sessions, id) = seeded_store().await;
    // Two fetches inside one freshness window prove the invalidation: without
    // it, the second dispatch would reuse the cached token.
    let source = token_source(2);
    let mut gateway = MockGateway::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let push_calls = calls.clone();
    gateway.expect_push_notification().times(2).returning(move |_, _| {
        if push_calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(GatewayError::Unauthorized)
        } else {
            Ok(json!({ "code": "success" }))
        }
    });
    let app =
        test::init_service(App::new().configure(configure_app(source, gateway, MockMirror::new(), sessions))).await;

    let req = TestRequest::post()
        .uri("/api/notification")
        .cookie(Cookie::new(SESSION_COOKIE, id.to_string()))
        .set_json(json!({ "userId": "u-1", "message": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "upstream-unauthorized");

    let req = TestRequest::post()
        .uri("/api/notification")
        .cookie(Cookie::new(SESSION_COOKIE, id.to_string()))
        .set_json(json!({ "userId": "u-1", "message": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn a_batch_of_1001_recipients_is_refused_before_upstream() {
    let (sessions, id) = seeded_store().await;
    let mut gateway = MockGateway::new();
    gateway.expect_push_notification().times(0);
    let app = test::init_service(
        App::new().configure(configure_app(token_source(0), gateway, MockMirror::new(), sessions)),
    )
    .await;
    let req = TestRequest::post()
        .uri("/api/notifications")
        .cookie(Cookie::new(SESSION_COOKIE, id.to_string()))
        .set_json(json!({ "userIds": vec!["u"; 1001], "message": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "batch-too-large");
}

#[actix_web::test]
async fn a_batch_of_exactly_1000_recipients_goes_through() {
    let (sessions, id) = seeded_store().await;
    let mut gateway = MockGateway::new();
    gateway
        .expect_push_notification()
        .withf(|_, request| request.user_ids.len() == 1000)
        .times(1)
        .returning(|_, _| Ok(json!({ "code": "success", "queued": 1000 })));
    let app = test::init_service(
        App::new().configure(configure_app(token_source(1), gateway, MockMirror::new(), sessions)),
    )
    .await;
    let req = TestRequest::post()
        .uri("/api/notifications")
        .cookie(Cookie::new(SESSION_COOKIE, id.to_string()))
        .set_json(json!({ "userIds": vec!["u"; 1000], "message": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["result"]["queued"], 1000);
}
