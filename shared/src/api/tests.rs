use super::*;
use crate::client::MockTransport;
use crate::config::ClientConfig;
use crate::error::ApiErrorKind;
use crate::protocol::{DeleteSerialsRequest, GenerateAclRequest, GenerateSerialsRequest, ServerPayload};
use crate::session::SessionStore;
use crate::storage::MemoryStorage;
use crate::User;
use serde_json::json;
use std::rc::Rc;

fn api() -> AdminApi<MockTransport> {
    let session = Rc::new(SessionStore::restore(MemoryStorage::new()));
    session
        .establish("t-1".into(), User::with_email("ops@example.com"))
        .unwrap();
    AdminApi::new(ApiClient::new(
        ClientConfig::default(),
        session,
        MockTransport::new(),
    ))
}

fn mock(api: &AdminApi<MockTransport>, path: &str, status: u16, body: Value) {
    api.client()
        .transport()
        .mock_response(&format!("/api{}", path), status, body);
}

/// (url, method, parsed body)
fn last(api: &AdminApi<MockTransport>) -> (String, String, Option<Value>) {
    let (url, method, _, body) = api.client().transport().last_request();
    let body = body.map(|b| serde_json::from_str(&b).unwrap());
    (url, method, body)
}

// =========================================================
// Wire contract
// =========================================================

#[tokio::test]
async fn login_posts_credentials() {
    let api = api();
    mock(&api, "/login", 200, json!({ "token": "t-2" }));

    api.login("ops@example.com", "hunter2").await.unwrap();

    assert_eq!(last(&api), (
        "/api/login".to_string(),
        "POST".to_string(),
        Some(json!({ "email": "ops@example.com", "password": "hunter2" })),
    ));
}

#[tokio::test]
async fn server_writes_send_exactly_the_payload_fields() {
    let api = api();
    mock(&api, "/add_server", 200, json!({ "success": true }));
    mock(&api, "/update_server/4", 200, json!({ "success": true }));
    let payload = ServerPayload {
        ip_address: "10.0.0.4".into(),
        region: "hk".into(),
        cpu: json!(8),
        memory: json!("16G"),
        category_id: Some(2),
        server_name: "edge-4".into(),
        storage: json!("200G"),
        bandwidth: json!("1G"),
        user_count: json!(10),
        total_traffic: json!(1024),
    };

    api.add_server(&payload).await.unwrap();
    let (url, method, body) = last(&api);
    assert_eq!((url.as_str(), method.as_str()), ("/api/add_server", "POST"));
    let body = body.unwrap();
    assert_eq!(body.as_object().unwrap().len(), 10);
    assert_eq!(body["server_name"], json!("edge-4"));

    api.update_server(4, &payload).await.unwrap();
    let (url, method, _) = last(&api);
    assert_eq!((url.as_str(), method.as_str()), ("/api/update_server/4", "PUT"));
}

#[tokio::test]
async fn server_containers_use_query_parameter() {
    let api = api();
    mock(&api, "/containers?server_id=3", 200, json!({ "containers": [] }));

    api.get_server_containers(3).await.unwrap();

    let (url, method, body) = last(&api);
    assert_eq!(url, "/api/containers?server_id=3");
    assert_eq!(method, "GET");
    assert_eq!(body, None);
}

#[tokio::test]
async fn path_segments_are_encoded() {
    let api = api();
    mock(&api, "/acl/download/ops%20team", 200, json!({}));
    mock(&api, "/containers/derp%2F1/stop", 200, json!({}));

    api.download_acl("ops team").await.unwrap();
    assert_eq!(last(&api).0, "/api/acl/download/ops%20team");

    api.stop_container("derp/1").await.unwrap();
    let (url, method, body) = last(&api);
    assert_eq!(url, "/api/containers/derp%2F1/stop");
    assert_eq!(method, "POST");
    assert_eq!(body, None);
}

#[tokio::test]
async fn acl_generation_body() {
    let api = api();
    mock(&api, "/acl/generate", 200, json!({ "success": true, "acl_id": 9 }));

    let result = api
        .generate_acl(&GenerateAclRequest {
            user_id: 1,
            container_ids: vec![5, 6],
            server_id: 2,
            is_active: true,
        })
        .await
        .unwrap();

    assert_eq!(result["acl_id"], json!(9));
    assert_eq!(
        last(&api).2,
        Some(json!({ "user_id": 1, "container_ids": [5, 6], "server_id": 2, "is_active": true }))
    );
}

#[tokio::test]
async fn serial_deletion_sends_codes_in_body() {
    let api = api();
    mock(&api, "/serial/delete", 200, json!({ "success": true }));

    api.batch_delete_serials(&["A1".to_string(), "B2".to_string()])
        .await
        .unwrap();

    assert_eq!(last(&api), (
        "/api/serial/delete".to_string(),
        "DELETE".to_string(),
        Some(json!({ "serial_codes": ["A1", "B2"] })),
    ));

    api.delete_serials(&DeleteSerialsRequest {
        serial_codes: vec!["C3".into()],
    })
    .await
    .unwrap();
    assert_eq!(last(&api).2, Some(json!({ "serial_codes": ["C3"] })));
}

#[tokio::test]
async fn empty_batch_is_rejected_locally() {
    let api = api();
    let err = api.batch_delete_serials(&[]).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::InvalidInput);
    assert_eq!(api.client().transport().request_count(), 0);
}

#[tokio::test]
async fn serial_generation_sends_integer_days() {
    let api = api();
    mock(&api, "/serial/generate", 201, json!({ "success": true, "serial_numbers": ["X"] }));

    let req = GenerateSerialsRequest::from_form(3, "30", "VIP").unwrap();
    api.generate_serials(&req).await.unwrap();

    assert_eq!(
        last(&api).2,
        Some(json!({ "count": 3, "valid_days": 30, "prefix": "VIP" }))
    );
}

#[tokio::test]
async fn small_bodies_match_backend_field_names() {
    let api = api();
    mock(&api, "/traffic/stats", 200, json!({}));
    mock(&api, "/rental/renew", 200, json!({}));
    mock(&api, "/rental/send_expiry_notifications", 200, json!({}));
    mock(&api, "/user/apply_distributor", 200, json!({}));
    mock(&api, "/alerts/traffic", 200, json!({}));
    mock(&api, "/alerts/server_health", 200, json!({}));
    mock(&api, "/alerts/docker_container", 200, json!({}));

    api.get_traffic_stats("2024-01-01", "2024-01-31").await.unwrap();
    assert_eq!(last(&api).2, Some(json!({ "start_date": "2024-01-01", "end_date": "2024-01-31" })));

    api.renew_rental(7, "2025-01-01").await.unwrap();
    assert_eq!(last(&api).2, Some(json!({ "rental_id": 7, "new_expiry_date": "2025-01-01" })));

    api.send_expiry_notifications(3, "2025-02-01").await.unwrap();
    assert_eq!(last(&api).2, Some(json!({ "user_id": 3, "expiry_date": "2025-02-01" })));

    api.apply_distributor(3, "D-42").await.unwrap();
    assert_eq!(last(&api).2, Some(json!({ "user_id": 3, "distributor_code": "D-42" })));

    api.check_monthly_traffic("2024-06").await.unwrap();
    assert_eq!(last(&api).2, Some(json!({ "month": "2024-06" })));

    api.check_server_health_status(2).await.unwrap();
    assert_eq!(last(&api).2, Some(json!({ "server_id": 2 })));

    api.check_docker_container("c-1").await.unwrap();
    assert_eq!(last(&api).2, Some(json!({ "container_id": "c-1" })));
}

#[tokio::test]
async fn verbs_for_resource_mutations() {
    let api = api();
    for path in [
        "/delete_server/1",
        "/logs/delete/2",
        "/rental/delete/3",
        "/rental/history/delete/4",
        "/alerts/delete/5",
    ] {
        mock(&api, path, 200, json!({ "success": true }));
    }
    mock(&api, "/notifications/8/read", 200, json!({ "success": true }));
    mock(&api, "/ha/load_balance", 200, json!({ "success": true }));

    api.delete_server(1).await.unwrap();
    api.delete_log(2).await.unwrap();
    api.delete_rental(3).await.unwrap();
    api.delete_rental_history(4).await.unwrap();
    api.delete_alert(5).await.unwrap();
    let methods: Vec<String> = api
        .client()
        .transport()
        .requests
        .borrow()
        .iter()
        .map(|r| r.1.clone())
        .collect();
    assert!(methods.iter().all(|m| m == "DELETE"));

    api.mark_notification_as_read(8).await.unwrap();
    assert_eq!(last(&api).1, "PUT");

    api.start_load_balance().await.unwrap();
    assert_eq!(last(&api).0, "/api/ha/load_balance");
    assert_eq!(last(&api).1, "POST");
}

// =========================================================
// Response reshaping
// =========================================================

#[tokio::test]
async fn lists_are_normalized_from_any_shape() {
    let api = api();
    mock(&api, "/get_servers", 200, json!([{ "id": 1, "ip": "10.0.0.1" }]));
    mock(&api, "/alerts", 200, json!({ "success": true, "alerts": [{ "id": 4 }] }));
    mock(&api, "/notifications", 200, json!({ "data": [{ "id": 8 }] }));
    mock(&api, "/users", 200, json!({ "success": true, "message": "empty" }));

    let servers = api.get_servers().await.unwrap();
    assert_eq!(servers[0].ip_address.as_deref(), Some("10.0.0.1"));
    assert_eq!(api.get_alerts().await.unwrap(), vec![json!({ "id": 4 })]);
    assert_eq!(api.get_notifications().await.unwrap(), vec![json!({ "id": 8 })]);
    assert!(api.get_all_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_bodies_yield_empty_lists() {
    let api = api();
    api.client().transport().mock_raw("/api/get_servers", 200, "");
    api.client().transport().mock_raw("/api/alerts", 200, " \n ");

    assert!(api.get_servers().await.unwrap().is_empty());
    assert!(api.get_alerts().await.unwrap().is_empty());
}

#[tokio::test]
async fn containers_gain_derived_ip() {
    let api = api();
    mock(
        &api,
        "/containers",
        200,
        json!({ "containers": [{ "name": "derp-172.16.0.9", "status": "running" }] }),
    );

    let containers = api.get_containers().await.unwrap();

    assert_eq!(containers[0].ip.as_deref(), Some("172.16.0.9"));
    assert_eq!(containers[0].status.as_deref(), Some("running"));
}

#[tokio::test]
async fn server_detail_is_extracted() {
    let api = api();
    mock(
        &api,
        "/server/5",
        200,
        json!({ "success": true, "server": { "id": 5, "region": "sg" } }),
    );

    let server = api.get_server(5).await.unwrap();
    assert_eq!(server.id, 5);
    assert_eq!(server.region.as_deref(), Some("sg"));
}

#[tokio::test]
async fn rejection_surfaces_as_error_with_trace() {
    let api = api();
    mock(&api, "/serial/check/NOPE", 200, json!({ "success": false, "message": "Serial number not found" }));

    let err = api.check_serial("NOPE").await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Rejected);
    assert_eq!(err.message(), "Serial number not found");
    assert!(err.spans().iter().any(|s| s.operation == "api.check_serial"));
}

#[tokio::test]
async fn malformed_list_is_a_decode_error() {
    let api = api();
    mock(&api, "/acl/list", 200, json!({ "acls": "not a list" }));

    let err = api.get_acl_list().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
}

#[tokio::test]
async fn unauthorized_from_any_wrapper_logs_out() {
    let api = api();
    mock(&api, "/ha/health", 401, json!({ "msg": "Token has expired" }));

    let err = api.get_ha_health().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!api.client().session().is_authenticated());
}
