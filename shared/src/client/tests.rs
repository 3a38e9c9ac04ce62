use super::*;
use crate::config::RetryPolicy;
use crate::error::ApiErrorKind;
use crate::guard::{NavigationDecision, RedirectReason, resolve};
use crate::route::AppRoute;
use crate::storage::{KeyValueStore, MemoryStorage};
use crate::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, User};
use serde_json::json;

// =========================================================
// Shared fixtures
// =========================================================

fn logged_in_session(storage: &MemoryStorage) -> Rc<SessionStore> {
    let session = Rc::new(SessionStore::restore(storage.clone()));
    session
        .establish("secret-token".into(), User::with_email("ops@example.com"))
        .unwrap();
    session
}

fn client(session: Rc<SessionStore>) -> ApiClient<MockTransport> {
    ApiClient::new(ClientConfig::default(), session, MockTransport::new())
}

// =========================================================
// Request interceptor
// =========================================================

#[tokio::test]
async fn attaches_bearer_token_when_present() {
    let session = logged_in_session(&MemoryStorage::new());
    let client = client(session);
    client
        .transport()
        .mock_response("/api/get_servers", 200, json!([]));

    client.fetch(ApiCall::get("/get_servers")).await.unwrap();

    let (url, method, headers, body) = client.transport().last_request();
    assert_eq!(url, "/api/get_servers");
    assert_eq!(method, "GET");
    assert_eq!(
        headers.get("Authorization").map(String::as_str),
        Some("Bearer secret-token")
    );
    assert_eq!(
        headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(body, None);
}

#[tokio::test]
async fn omits_authorization_when_anonymous() {
    let session = Rc::new(SessionStore::restore(MemoryStorage::new()));
    let client = client(session);
    client.transport().mock_response("/api/alerts", 200, json!([]));

    client.fetch(ApiCall::get("/alerts")).await.unwrap();

    let (_, _, headers, _) = client.transport().last_request();
    assert!(!headers.contains_key("Authorization"));
}

#[tokio::test]
async fn token_is_read_per_request() {
    let storage = MemoryStorage::new();
    let session = logged_in_session(&storage);
    let client = client(session.clone());
    client.transport().mock_response("/api/alerts", 200, json!([]));

    client.fetch(ApiCall::get("/alerts")).await.unwrap();
    session
        .establish("rotated".into(), User::with_email("ops@example.com"))
        .unwrap();
    client.fetch(ApiCall::get("/alerts")).await.unwrap();

    let (_, _, headers, _) = client.transport().last_request();
    assert_eq!(
        headers.get("Authorization").map(String::as_str),
        Some("Bearer rotated")
    );
}

// =========================================================
// Response interceptor
// =========================================================

#[tokio::test]
async fn unauthorized_clears_session_and_still_fails() {
    let storage = MemoryStorage::new();
    let session = logged_in_session(&storage);
    let client = client(session.clone());
    client.transport().mock_response(
        "/api/serials",
        401,
        json!({ "message": "Token has expired" }),
    );

    let err = client.fetch(ApiCall::get("/serials")).await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Unauthorized);
    assert_eq!(err.message(), "Token has expired");
    assert_eq!(session.token(), None);
    assert_eq!(session.user(), None);
    assert!(storage.get(STORAGE_TOKEN_KEY).is_none());
    assert!(storage.get(STORAGE_USER_KEY).is_none());

    // 下一次受保护导航必然落到登录页
    assert_eq!(
        resolve(AppRoute::Servers, &session.snapshot()),
        NavigationDecision::Redirect {
            to: AppRoute::Login,
            reason: RedirectReason::NotAuthenticated,
        }
    );
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let session = logged_in_session(&MemoryStorage::new());
    let client = client(session);
    client
        .transport()
        .mock_response("/api/get_servers", 401, json!({}));

    client.fetch(ApiCall::get("/get_servers")).await.unwrap_err();

    assert_eq!(client.transport().request_count(), 1);
}

#[tokio::test]
async fn other_statuses_become_http_errors() {
    let session = logged_in_session(&MemoryStorage::new());
    let client = client(session.clone());
    client.transport().mock_response(
        "/api/alerts/add",
        403,
        json!({ "success": false, "message": "You are not authorized to perform this action" }),
    );

    let err = client
        .fetch(ApiCall::post("/alerts/add"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Http);
    assert_eq!(err.status, Some(403));
    assert_eq!(err.message(), "You are not authorized to perform this action");
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn json_null_body_is_null() {
    let session = logged_in_session(&MemoryStorage::new());
    let client = client(session);
    client
        .transport()
        .mock_response("/api/ha/failover", 200, json!(null));

    let value = client.fetch(ApiCall::post("/ha/failover")).await.unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn empty_and_blank_bodies_are_null() {
    let session = logged_in_session(&MemoryStorage::new());
    let client = client(session);
    client.transport().mock_raw("/api/ha/failover", 204, "");
    client.transport().mock_raw("/api/ha/sync", 200, "  \n\t ");

    assert_eq!(client.fetch(ApiCall::post("/ha/failover")).await.unwrap(), Value::Null);
    assert_eq!(client.fetch(ApiCall::post("/ha/sync")).await.unwrap(), Value::Null);
}

#[tokio::test]
async fn success_false_is_rejected_uniformly() {
    let session = logged_in_session(&MemoryStorage::new());
    let client = client(session);
    client.transport().mock_response(
        "/api/serial/generate",
        200,
        json!({ "success": false, "message": "Invalid parameters" }),
    );

    let err = client
        .fetch(ApiCall::post("/serial/generate"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Rejected);
}

// =========================================================
// Retry policy
// =========================================================

#[tokio::test]
async fn idempotent_reads_retry_transport_failures() {
    let session = logged_in_session(&MemoryStorage::new());
    let client = client(session);
    client
        .transport()
        .mock_failure("/api/monitoring", "connection reset");
    client
        .transport()
        .mock_response("/api/monitoring", 200, json!({ "cpu": 12 }));

    let value = client.fetch(ApiCall::get("/monitoring")).await.unwrap();

    assert_eq!(value, json!({ "cpu": 12 }));
    assert_eq!(client.transport().request_count(), 2);
}

#[tokio::test]
async fn writes_are_never_retried() {
    let session = logged_in_session(&MemoryStorage::new());
    let client = client(session);
    client
        .transport()
        .mock_failure("/api/ha/failover", "connection reset");
    client
        .transport()
        .mock_response("/api/ha/failover", 200, json!({}));

    let err = client
        .fetch(ApiCall::post("/ha/failover"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Transport);
    assert_eq!(client.transport().request_count(), 1);
}

#[tokio::test]
async fn retries_are_bounded() {
    let session = logged_in_session(&MemoryStorage::new());
    let config = ClientConfig::default().with_retry(RetryPolicy::new(2));
    let client = ApiClient::new(config, session, MockTransport::new());
    client
        .transport()
        .mock_failure("/api/monitoring", "offline");

    let err = client.fetch(ApiCall::get("/monitoring")).await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Transport);
    assert_eq!(client.transport().request_count(), 3);
}

// =========================================================
// Login special case
// =========================================================

#[tokio::test]
async fn login_response_is_normalized() {
    let session = Rc::new(SessionStore::restore(MemoryStorage::new()));
    let client = client(session);
    client.transport().mock_response(
        "/api/login",
        200,
        json!({ "token": "t-9", "user": { "email": "ops@example.com" }, "message": "ok" }),
    );

    let env = client
        .fetch_login(ApiCall::post("/login"))
        .await
        .unwrap();

    assert!(env.success);
    assert_eq!(env.token, "t-9");
    assert_eq!(env.data, json!({ "email": "ops@example.com" }));
    assert_eq!(env.message.as_deref(), Some("ok"));
}
