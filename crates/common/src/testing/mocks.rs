//! Mock implementations of the token endpoint traits

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::auth::{
    AuthError, AuthResult, BlockingTokenEndpoint, OAuthError, TokenEndpoint, TokenRequest,
    TokenResponse,
};

enum Scripted {
    Token(TokenResponse),
    Rejection(u16, Option<OAuthError>),
}

#[derive(Default)]
struct MockState {
    script: VecDeque<Scripted>,
    requests: Vec<TokenRequest>,
}

/// Mock token endpoint that replays scripted responses without network calls.
///
/// Every received [`TokenRequest`] is recorded. When the script runs dry the
/// endpoint answers with a generic bearer token so tests only script what
/// they assert on. Clones share the same script and log.
#[derive(Clone, Default)]
pub struct MockTokenEndpoint {
    state: Arc<Mutex<MockState>>,
}

impl MockTokenEndpoint {
    /// Create a mock with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw token response.
    pub fn push_response(&self, response: TokenResponse) {
        self.state.lock().script.push_back(Scripted::Token(response));
    }

    /// Queue a token with only `access_token` and `expires_in` set.
    pub fn push_token(&self, access_token: &str, expires_in: i64) {
        self.push_response(TokenResponse {
            access_token: Some(access_token.to_string()),
            expires_in: Some(expires_in),
            ..TokenResponse::default()
        });
    }

    /// Queue a non-success status without an OAuth error body.
    pub fn push_rejection(&self, status: u16) {
        self.state.lock().script.push_back(Scripted::Rejection(status, None));
    }

    /// Queue a non-success status with an OAuth error body.
    pub fn push_oauth_error(&self, status: u16, error: &str) {
        let body = OAuthError { error: error.to_string(), error_description: None };
        self.state.lock().script.push_back(Scripted::Rejection(status, Some(body)));
    }

    /// Number of token requests received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// All token requests received, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<TokenRequest> {
        self.state.lock().requests.clone()
    }

    /// Most recent token request.
    #[must_use]
    pub fn last_request(&self) -> Option<TokenRequest> {
        self.state.lock().requests.last().cloned()
    }

    /// Forget recorded requests and pending script entries.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.script.clear();
        state.requests.clear();
    }

    fn respond(&self, request: &TokenRequest) -> AuthResult<TokenResponse> {
        let mut state = self.state.lock();
        state.requests.push(request.clone());
        let call = state.requests.len();

        match state.script.pop_front() {
            Some(Scripted::Token(response)) => Ok(response),
            Some(Scripted::Rejection(status, error)) => {
                Err(AuthError::Rejected { grant: request.grant(), status, error })
            }
            None => Ok(TokenResponse {
                access_token: Some(format!("mock_access_token_{call}")),
                ..TokenResponse::default()
            }),
        }
    }
}

impl std::fmt::Debug for MockTokenEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockTokenEndpoint")
            .field("pending", &state.script.len())
            .field("requests", &state.requests.len())
            .finish()
    }
}

#[async_trait]
impl TokenEndpoint for MockTokenEndpoint {
    async fn request_token(&self, request: &TokenRequest) -> AuthResult<TokenResponse> {
        self.respond(request)
    }
}

impl BlockingTokenEndpoint for MockTokenEndpoint {
    fn request_token(&self, request: &TokenRequest) -> AuthResult<TokenResponse> {
        self.respond(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::GrantType;

    /// Validates `MockTokenEndpoint` replay order for the scripted scenario.
    ///
    /// Assertions:
    /// - Confirms scripted entries are returned in order.
    /// - Confirms the fallback token once the script is exhausted.
    /// - Confirms every request is recorded.
    #[tokio::test]
    async fn test_mock_endpoint_replays_script() {
        let endpoint = MockTokenEndpoint::new();
        endpoint.push_token("first", 60);
        endpoint.push_oauth_error(400, "invalid_grant");
        let request = TokenRequest::new(GrantType::ClientCredentials);

        let first = TokenEndpoint::request_token(&endpoint, &request).await.unwrap();
        assert_eq!(first.access_token.as_deref(), Some("first"));

        let second = TokenEndpoint::request_token(&endpoint, &request).await;
        assert!(matches!(second, Err(AuthError::Rejected { status: 400, error: Some(_), .. })));

        let third = BlockingTokenEndpoint::request_token(&endpoint, &request).unwrap();
        assert_eq!(third.access_token.as_deref(), Some("mock_access_token_3"));
        assert_eq!(endpoint.call_count(), 3);
    }

    /// Validates `MockTokenEndpoint::reset` behavior.
    ///
    /// Assertions:
    /// - Ensures `call_count` returns to zero.
    #[test]
    fn test_mock_endpoint_reset() {
        let endpoint = MockTokenEndpoint::new();
        endpoint.push_rejection(500);
        let _ = BlockingTokenEndpoint::request_token(
            &endpoint,
            &TokenRequest::new(GrantType::RefreshToken),
        );
        endpoint.reset();
        assert_eq!(endpoint.call_count(), 0);
        assert!(endpoint.last_request().is_none());
    }
}
