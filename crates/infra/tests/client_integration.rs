//! End-to-end tests for the Basalam client against a mock platform
//!
//! One `MockServer` plays both the token endpoint and every service host.

#[path = "support.rs"]
mod support;

use basalam_common::auth::{AuthError, ClientCredentialsFlow, TokenStatus};
use basalam_domain::{CreateWebhookRequest, MessageQuery, RefundRequest, RefundResponse};
use basalam_infra::{ApiError, ApiErrorKind, BasalamClient, BlockingBasalamClient};
use serde_json::json;
use support::{config_for, init_tracing, mount_token_sequence};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn flow() -> ClientCredentialsFlow {
    ClientCredentialsFlow::new("client-id", "client-secret")
        .with_scopes(["customer.wallet.read", "vendor.profile.read"])
}

fn user_body() -> serde_json::Value {
    json!({
        "id": 42,
        "name": "Sara",
        "email": "sara@example.com",
        "mobile": "09120000000",
        "avatar": null,
        "created_at": "2024-01-05T10:00:00Z",
        "updated_at": "2024-03-01T08:30:00Z"
    })
}

#[tokio::test]
async fn test_first_call_acquires_token_and_grants_scopes() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_sequence(&server, &["tok-1"], "customer.wallet.read vendor.profile.read").await;
    Mock::given(method("GET"))
        .and(path("/v3/users/me"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = BasalamClient::new(flow(), config_for(&server)).unwrap();
    assert_eq!(client.session().status(), TokenStatus::NoToken);

    let user = client.core().get_current_user().await.unwrap();
    assert_eq!(user.id, 42);
    assert_eq!(client.session().status(), TokenStatus::Valid);
    assert!(client.has_scope("customer.wallet.read"));
    assert_eq!(client.granted_scopes().len(), 2);
}

#[tokio::test]
async fn test_stale_token_is_refreshed_once_and_request_resent() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_sequence(&server, &["stale", "fresh"], "customer.wallet.read").await;
    Mock::given(method("GET"))
        .and(path("/v3/users/me"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "token expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/users/me"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = BasalamClient::new(flow(), config_for(&server)).unwrap();
    let user = client.core().get_current_user().await.unwrap();

    assert_eq!(user.name, "Sara");
    assert_eq!(client.session().current_token().unwrap().access_token(), "fresh");
}

#[tokio::test]
async fn test_second_rejection_surfaces_auth_error_without_third_attempt() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_sequence(&server, &["first", "second"], "").await;
    Mock::given(method("GET"))
        .and(path("/v3/users/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "revoked" })))
        .expect(2)
        .mount(&server)
        .await;

    let client = BasalamClient::new(flow(), config_for(&server)).unwrap();
    let err = client.core().get_current_user().await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::Auth);
    assert!(matches!(
        err,
        ApiError::Auth(AuthError::Unauthorized(ref message)) if message == "revoked"
    ));
}

#[tokio::test]
async fn test_failed_token_request_is_an_auth_error() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(support::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "bad secret"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = BasalamClient::new(flow(), config_for(&server)).unwrap();
    let err = client.core().get_current_user().await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_error_statuses_are_classified_and_not_retried() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_sequence(&server, &["tok"], "").await;
    Mock::given(method("DELETE"))
        .and(path("/v1/webhooks/9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "no such webhook" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/webhooks"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "code": "E_DOWN", "message": "maintenance" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = BasalamClient::new(flow(), config_for(&server)).unwrap();

    let missing = client.webhook().delete_webhook(9).await.unwrap_err();
    assert!(matches!(
        missing,
        ApiError::NotFound { ref message, .. } if message == "no such webhook"
    ));

    let down = client.webhook().get_webhooks().await.unwrap_err();
    match down {
        ApiError::Api { status, code, message } => {
            assert_eq!(status, 500);
            assert_eq!(code, "E_DOWN");
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_a_validation_error() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_sequence(&server, &["tok"], "").await;
    Mock::given(method("GET"))
        .and(path("/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = BasalamClient::new(flow(), config_for(&server)).unwrap();

    let services = client.webhook().get_webhook_services().await.unwrap_err();
    assert_eq!(services.kind(), ApiErrorKind::Validation);
    let events = client.webhook().get_webhook_events().await.unwrap_err();
    assert_eq!(events.kind(), ApiErrorKind::Validation);
}

#[tokio::test]
async fn test_webhook_creation_sends_active_subscription() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_sequence(&server, &["tok"], "").await;
    Mock::given(method("POST"))
        .and(path("/v1/webhooks"))
        .and(body_json(json!({
            "service_id": 3,
            "url": "https://hooks.example/in",
            "event_ids": ["order.created"],
            "is_active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 17,
            "service_id": 3,
            "url": "https://hooks.example/in",
            "event_ids": ["order.created"],
            "is_active": true,
            "created_at": "2024-05-01 10:00:00",
            "updated_at": "2024-05-01 10:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BasalamClient::new(flow(), config_for(&server)).unwrap();
    let request =
        CreateWebhookRequest::new(3, "https://hooks.example/in", vec!["order.created".to_string()]);
    let webhook = client.webhook().create_webhook(&request).await.unwrap();

    assert_eq!(webhook.id, 17);
    assert!(webhook.is_active);
}

#[tokio::test]
async fn test_wallet_refund_union_and_operator_header() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_sequence(&server, &["tok"], "").await;
    Mock::given(method("POST"))
        .and(path("/v2/refund"))
        .and(header("x-operator-id", "77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "client_id": 12,
            "reference_id": 99,
            "user_id": 42,
            "amount": 1500,
            "description": "refund",
            "credits": []
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/can-rollback-refund"))
        .and(body_json(json!({ "refund_reason": 3, "refund_reference_id": 99 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BasalamClient::new(flow(), config_for(&server)).unwrap();
    let refund: RefundRequest = serde_json::from_value(json!({
        "original_reason": 1,
        "original_reference_id": 10,
        "reason": 3,
        "reference_id": 99,
        "amount": 1500,
        "description": "refund"
    }))
    .unwrap();

    let outcome = client.wallet().refund(&refund, Some(77)).await.unwrap();
    assert!(matches!(outcome, RefundResponse::Credit(_)));
    assert_eq!(outcome.amount(), 1500);

    assert!(client.wallet().can_rollback_refund(3, 99, None).await.unwrap());
}

#[tokio::test]
async fn test_wallet_history_and_empty_bodies() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_sequence(&server, &["tok"], "").await;
    Mock::given(method("GET"))
        .and(path("/v2/user/42/history"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "total": 0,
            "per_page": 10,
            "current_page": 2,
            "last_page": 1,
            "from": 0,
            "to": 0
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/chat"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/chat/5/messages"))
        .and(query_param("chatType", "ALL"))
        .and(query_param("order", "DESC"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "messages": [] } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = BasalamClient::new(flow(), config_for(&server)).unwrap();

    let page = client.wallet().get_history(42, 2, 10, None).await.unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.current_page, 2);

    let private_chat = basalam_domain::CreateChatRequest::private(8);
    let created = client.chat().create_chat(&private_chat).await.unwrap();
    assert!(created.is_null());

    let messages = client.chat().get_messages(5, &MessageQuery::default()).await.unwrap();
    assert!(messages["data"]["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_refresh_auth_token_replaces_cached_token() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_sequence(&server, &["one", "two"], "").await;

    let client = BasalamClient::new(flow(), config_for(&server)).unwrap();
    client.session().token().await.unwrap();
    let refreshed = client.refresh_auth_token().await.unwrap();

    assert_eq!(refreshed.access_token(), "two");
    assert_eq!(client.session().current_token().unwrap().access_token(), "two");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_client_matches_async_retry_contract() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_sequence(&server, &["stale", "fresh"], "customer.wallet.read").await;
    Mock::given(method("GET"))
        .and(path("/v3/users/me"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/users/me"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let (user, scoped) = tokio::task::spawn_blocking(move || {
        let client = BlockingBasalamClient::new(flow(), config).unwrap();
        let user = client.core().get_current_user();
        (user, client.has_scope("customer.wallet.read"))
    })
    .await
    .unwrap();

    assert_eq!(user.unwrap().id, 42);
    assert!(scoped);
}
