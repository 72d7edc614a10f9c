//! Token request shapes and response interpretation.
//!
//! Flows never perform I/O themselves. They describe the form to POST as a
//! [`TokenRequest`], or decide the current token can be reused, through a
//! [`TokenPlan`]. The async and blocking endpoints both execute the same
//! plans and interpret responses with [`interpret_response`], so the two call
//! modes cannot drift apart.

use std::fmt;

use chrono::Utc;
use tracing::debug;

use super::error::{AuthError, AuthResult};
use super::traits::{BlockingTokenEndpoint, TokenEndpoint};
use super::types::{GrantType, OAuthError, TokenFallback, TokenResponse, TokenState};

/// Form fields whose values must never be rendered.
const SECRET_FIELDS: &[&str] = &["client_secret", "refresh_token", "code"];

/// One form-encoded POST to the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenRequest {
    grant: GrantType,
    form: Vec<(String, String)>,
    fallback: TokenFallback,
}

impl TokenRequest {
    /// Start a request for `grant`; the `grant_type` field is added here.
    #[must_use]
    pub fn new(grant: GrantType) -> Self {
        Self {
            grant,
            form: vec![("grant_type".to_string(), grant.as_str().to_string())],
            fallback: TokenFallback::default(),
        }
    }

    /// Append a form field.
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.form.push((name.to_string(), value.into()));
        self
    }

    /// Values to carry into the new token when the server omits them.
    #[must_use]
    pub fn with_fallback(mut self, fallback: TokenFallback) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub const fn grant(&self) -> GrantType {
        self.grant
    }

    /// Form pairs in insertion order.
    #[must_use]
    pub fn form(&self) -> &[(String, String)] {
        &self.form
    }

    /// Value of a form field, if present.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.form.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub const fn fallback(&self) -> &TokenFallback {
        &self.fallback
    }

    /// Turn a successful response into a token, applying the fallback.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidResponse` if the response has no access
    /// token.
    pub fn into_token(self, response: TokenResponse) -> AuthResult<TokenState> {
        TokenState::from_response(response, &self.fallback, Utc::now())
    }

    /// POST this request through an async endpoint.
    ///
    /// # Errors
    /// Propagates endpoint failures and invalid responses.
    pub async fn send<E>(self, endpoint: &E) -> AuthResult<TokenState>
    where
        E: TokenEndpoint + ?Sized,
    {
        debug!(grant = %self.grant, "Requesting token");
        let response = endpoint.request_token(&self).await?;
        self.into_token(response)
    }

    /// POST this request through a blocking endpoint.
    ///
    /// # Errors
    /// Propagates endpoint failures and invalid responses.
    pub fn send_blocking<E>(self, endpoint: &E) -> AuthResult<TokenState>
    where
        E: BlockingTokenEndpoint + ?Sized,
    {
        debug!(grant = %self.grant, "Requesting token (blocking)");
        let response = endpoint.request_token(&self)?;
        self.into_token(response)
    }
}

impl fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form: Vec<(&str, &str)> = self
            .form
            .iter()
            .map(|(key, value)| {
                let shown =
                    if SECRET_FIELDS.contains(&key.as_str()) { "<redacted>" } else { value };
                (key.as_str(), shown)
            })
            .collect();
        f.debug_struct("TokenRequest").field("grant", &self.grant).field("form", &form).finish()
    }
}

/// What a flow needs done to produce a usable token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPlan {
    /// The current token is still good to use.
    Reuse(TokenState),
    /// A token endpoint call is required.
    Request(TokenRequest),
}

impl TokenPlan {
    /// Execute the plan against an async endpoint.
    ///
    /// # Errors
    /// Propagates endpoint failures and invalid responses.
    pub async fn execute<E>(self, endpoint: &E) -> AuthResult<TokenState>
    where
        E: TokenEndpoint + ?Sized,
    {
        match self {
            Self::Reuse(token) => Ok(token),
            Self::Request(request) => request.send(endpoint).await,
        }
    }

    /// Execute the plan against a blocking endpoint.
    ///
    /// # Errors
    /// Propagates endpoint failures and invalid responses.
    pub fn execute_blocking<E>(self, endpoint: &E) -> AuthResult<TokenState>
    where
        E: BlockingTokenEndpoint + ?Sized,
    {
        match self {
            Self::Reuse(token) => Ok(token),
            Self::Request(request) => request.send_blocking(endpoint),
        }
    }
}

/// Interpret a raw token-endpoint response.
///
/// A 2xx body must be a JSON token response. Any other status becomes
/// `AuthError::Rejected`, carrying the OAuth error body when the server sent
/// one.
///
/// # Errors
/// Returns `Rejected` for non-success statuses and `InvalidResponse` for
/// undecodable success bodies.
pub fn interpret_response(grant: GrantType, status: u16, body: &[u8]) -> AuthResult<TokenResponse> {
    if !(200..300).contains(&status) {
        let error = serde_json::from_slice::<OAuthError>(body).ok();
        return Err(AuthError::Rejected { grant, status, error });
    }

    serde_json::from_slice(body)
        .map_err(|e| AuthError::InvalidResponse(format!("token response is not valid JSON: {e}")))
}
