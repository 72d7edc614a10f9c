//! HTTP token endpoint clients
//!
//! POST form-encoded grant requests to the authorization server's token URL
//! and hand the decoded body back to the flow. One client per call mode:
//! [`HttpTokenEndpoint`] on `reqwest::Client`, [`BlockingHttpTokenEndpoint`]
//! on `reqwest::blocking::Client`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::{AuthError, AuthResult};
use super::request::{interpret_response, TokenRequest};
use super::traits::{BlockingTokenEndpoint, TokenEndpoint};
use super::types::TokenResponse;

/// Default timeout for token endpoint calls.
pub const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Async token endpoint backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTokenEndpoint {
    token_url: String,
    client: reqwest::Client,
}

impl HttpTokenEndpoint {
    /// Create a client for `token_url` with its own connection pool.
    ///
    /// # Errors
    /// `ClientBuild` when the TLS backend cannot be initialised.
    pub fn new(token_url: impl Into<String>, timeout: Duration) -> AuthResult<Self> {
        let client =
            reqwest::Client::builder().timeout(timeout).build().map_err(AuthError::ClientBuild)?;
        Ok(Self::with_client(token_url, client))
    }

    /// Reuse an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(token_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self { token_url: token_url.into(), client }
    }

    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    async fn request_token(&self, request: &TokenRequest) -> AuthResult<TokenResponse> {
        let grant = request.grant();
        debug!(url = %self.token_url, %grant, "POST token request");

        let response = self
            .client
            .post(&self.token_url)
            .form(request.form())
            .send()
            .await
            .map_err(|source| AuthError::Transport { grant, source })?;

        let status = response.status().as_u16();
        let body =
            response.bytes().await.map_err(|source| AuthError::Transport { grant, source })?;

        let result = interpret_response(grant, status, &body);
        if result.is_err() {
            warn!(%grant, status, "Token endpoint returned an error");
        }
        result
    }
}

/// Blocking token endpoint backed by `reqwest::blocking`.
///
/// Must not be created or dropped on an async runtime thread; use it from
/// plain threads or `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct BlockingHttpTokenEndpoint {
    token_url: String,
    client: reqwest::blocking::Client,
}

impl BlockingHttpTokenEndpoint {
    /// Create a client for `token_url` with its own connection pool.
    ///
    /// # Errors
    /// `ClientBuild` when the TLS backend cannot be initialised.
    pub fn new(token_url: impl Into<String>, timeout: Duration) -> AuthResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AuthError::ClientBuild)?;
        Ok(Self::with_client(token_url, client))
    }

    /// Reuse an existing blocking client.
    #[must_use]
    pub fn with_client(token_url: impl Into<String>, client: reqwest::blocking::Client) -> Self {
        Self { token_url: token_url.into(), client }
    }

    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

impl BlockingTokenEndpoint for BlockingHttpTokenEndpoint {
    fn request_token(&self, request: &TokenRequest) -> AuthResult<TokenResponse> {
        let grant = request.grant();
        debug!(url = %self.token_url, %grant, "POST token request (blocking)");

        let response = self
            .client
            .post(&self.token_url)
            .form(request.form())
            .send()
            .map_err(|source| AuthError::Transport { grant, source })?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(|source| AuthError::Transport { grant, source })?;

        let result = interpret_response(grant, status, &body);
        if result.is_err() {
            warn!(%grant, status, "Token endpoint returned an error");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::types::GrantType;

    #[tokio::test]
    async fn test_posts_form_and_decodes_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("scope=x%3Aread"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "abc",
                "expires_in": 1800
            })))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint =
            HttpTokenEndpoint::new(format!("{}/oauth/token", server.uri()), DEFAULT_TOKEN_TIMEOUT)
                .unwrap();
        let request = TokenRequest::new(GrantType::ClientCredentials).field("scope", "x:read");

        let response = endpoint.request_token(&request).await.unwrap();
        assert_eq!(response.access_token.as_deref(), Some("abc"));
        assert_eq!(response.expires_in, Some(1800));
    }

    #[tokio::test]
    async fn test_rejection_carries_oauth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "invalid_client"
            })))
            .mount(&server)
            .await;

        let endpoint = HttpTokenEndpoint::new(server.uri(), DEFAULT_TOKEN_TIMEOUT).unwrap();
        let request = TokenRequest::new(GrantType::ClientCredentials);

        match endpoint.request_token(&request).await {
            Err(AuthError::Rejected { status: 401, error: Some(error), .. }) => {
                assert_eq!(error.error, "invalid_client");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let endpoint =
            HttpTokenEndpoint::new("http://127.0.0.1:9/oauth/token", Duration::from_secs(2))
                .unwrap();
        let request = TokenRequest::new(GrantType::RefreshToken);

        let err = endpoint.request_token(&request).await.unwrap_err();
        assert!(matches!(err, AuthError::Transport { grant: GrantType::RefreshToken, .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_blocking_endpoint_matches_async_behaviour() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "sync-token"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/oauth/token", server.uri());
        let response = tokio::task::spawn_blocking(move || {
            let endpoint = BlockingHttpTokenEndpoint::new(url, DEFAULT_TOKEN_TIMEOUT)?;
            endpoint.request_token(&TokenRequest::new(GrantType::ClientCredentials))
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(response.access_token.as_deref(), Some("sync-token"));
    }

    #[tokio::test]
    async fn test_configured_timeout_is_applied() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": "late" }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let endpoint = HttpTokenEndpoint::new(server.uri(), Duration::from_millis(200)).unwrap();
        assert_eq!(endpoint.token_url(), server.uri());

        let err = endpoint
            .request_token(&TokenRequest::new(GrantType::ClientCredentials))
            .await
            .unwrap_err();
        match err {
            AuthError::Transport { source, .. } => assert!(source.is_timeout()),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
