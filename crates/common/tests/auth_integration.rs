//! Integration tests for auth module
//!
//! Drives sessions through the real `reqwest` token endpoints against a
//! wiremock authorization server.

#![cfg(feature = "platform")]

use std::collections::HashSet;
use std::sync::Arc;

use basalam_common::auth::{
    AuthError, AuthSession, AuthorizationCodeFlow, BlockingAuthSession, BlockingHttpTokenEndpoint,
    ClientCredentialsFlow, HttpTokenEndpoint, TokenStatus, DEFAULT_TOKEN_TIMEOUT,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_url(server: &MockServer) -> String {
    format!("{}/oauth/token", server.uri())
}

fn http_endpoint(server: &MockServer) -> Arc<HttpTokenEndpoint> {
    Arc::new(
        HttpTokenEndpoint::new(token_url(server), DEFAULT_TOKEN_TIMEOUT)
            .expect("token endpoint client should build"),
    )
}

/// Validates the client-credentials scenario end to end.
///
/// A session configured with `x:read y:read` fetches a token whose response
/// omits `scope`; the granted scopes must fall back to the requested ones.
///
/// # Test Steps
/// 1. Mount a token endpoint expecting exactly one client-credentials call
/// 2. Request headers twice
/// 3. Verify header value, granted scopes and refresh state
#[tokio::test(flavor = "multi_thread")]
async fn test_client_credentials_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=my-client"))
        .and(body_string_contains("scope=x%3Aread+y%3Aread"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "cc-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow =
        ClientCredentialsFlow::new("my-client", "my-secret").with_scopes(["x:read", "y:read"]);
    let session = AuthSession::new(flow, http_endpoint(&server));

    let headers = session.get_auth_headers().await.expect("headers should be issued");
    assert_eq!(headers["Authorization"], "Bearer cc-token");
    session.get_auth_headers().await.expect("cached headers should be reused");

    assert_eq!(
        session.granted_scopes(),
        HashSet::from(["x:read".to_string(), "y:read".to_string()])
    );
    let token = session.current_token().expect("token should be cached");
    assert!(!token.should_refresh());
    assert_eq!(session.status(), TokenStatus::Valid);
}

/// Validates authorization-code exchange followed by a forced refresh.
///
/// # Test Steps
/// 1. Exchange a code; the response carries a refresh token and scope
/// 2. Force a refresh; the response omits both
/// 3. Verify the previous refresh token and scope were carried forward
#[tokio::test(flavor = "multi_thread")]
async fn test_authorization_code_exchange_then_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "first",
            "refresh_token": "refresh-1",
            "scope": "customer.order.read"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "access_token": "second" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let flow = AuthorizationCodeFlow::new("cid", "secret", "https://app.example/callback");
    let session = AuthSession::new(flow, http_endpoint(&server));

    let exchanged = session.exchange_code("the-code").await.expect("exchange should succeed");
    assert_eq!(exchanged.access_token(), "first");

    let refreshed = session.force_refresh().await.expect("refresh should succeed");
    assert_eq!(refreshed.access_token(), "second");
    assert_eq!(refreshed.refresh_token(), Some("refresh-1"));
    assert_eq!(refreshed.scope(), Some("customer.order.read"));
    assert_eq!(session.authorization().await.expect("cached"), "Bearer second");
}

/// Validates that a rejected token request surfaces as an `AuthError` and
/// leaves the session empty.
#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "unknown client"
        })))
        .mount(&server)
        .await;

    let session = AuthSession::new(
        ClientCredentialsFlow::new("bad", "creds"),
        http_endpoint(&server),
    );

    let err = session.get_auth_headers().await.expect_err("credentials should be rejected");
    assert!(matches!(err, AuthError::Rejected { status: 401, .. }));
    assert!(err.to_string().contains("unknown client"));
    assert_eq!(session.status(), TokenStatus::NoToken);
}

/// Validates the blocking session against the same wiremock server.
#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_session_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "blocking-token",
            "expires_in": 600
        })))
        .expect(2)
        .mount(&server)
        .await;

    let url = token_url(&server);
    let (first, refreshed) = tokio::task::spawn_blocking(move || {
        let endpoint = BlockingHttpTokenEndpoint::new(url, DEFAULT_TOKEN_TIMEOUT)
            .expect("token endpoint client should build");
        let flow = ClientCredentialsFlow::new("id", "secret");
        let session = BlockingAuthSession::new(flow, Arc::new(endpoint));
        let first = session.authorization();
        let refreshed = session.force_refresh().map(|token| token.expires_in());
        (first, refreshed)
    })
    .await
    .expect("blocking task should join");

    assert_eq!(first.expect("authorization"), "Bearer blocking-token");
    assert_eq!(refreshed.expect("refresh"), 600);
}
