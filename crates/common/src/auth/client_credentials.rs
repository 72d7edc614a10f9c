//! Client-credentials grant
//!
//! Server-to-server flow: the client authenticates with its own id and
//! secret. There is no refresh token; "refresh" simply fetches a new token
//! with the same credentials.

use std::fmt;

use super::error::AuthResult;
use super::request::{TokenPlan, TokenRequest};
use super::scope::Scope;
use super::traits::{BlockingTokenEndpoint, GrantFlow, TokenEndpoint};
use super::types::{GrantType, TokenFallback, TokenState};

/// Client-credentials flow configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentialsFlow {
    client_id: String,
    client_secret: String,
    scope: String,
}

impl ClientCredentialsFlow {
    /// Create a flow requesting the wildcard scope `*`.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: Scope::ALL.as_str().to_string(),
        }
    }

    /// Request an explicit list of scopes instead of the wildcard.
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scope = Scope::join(scopes);
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Space-separated scope string sent with every request.
    #[must_use]
    pub fn requested_scope(&self) -> &str {
        &self.scope
    }

    /// The form POSTed for both fetch and refresh.
    #[must_use]
    pub fn token_request(&self) -> TokenRequest {
        let mut request = TokenRequest::new(GrantType::ClientCredentials)
            .field("client_id", self.client_id.as_str())
            .field("client_secret", self.client_secret.as_str());

        let mut fallback = TokenFallback::default();
        if !self.scope.is_empty() {
            request = request.field("scope", self.scope.as_str());
            fallback.scope = Some(self.scope.clone());
        }
        request.with_fallback(fallback)
    }

    /// Obtain a new token.
    ///
    /// # Errors
    /// Returns an `AuthError` when the token endpoint fails or rejects the
    /// credentials.
    pub async fn fetch<E>(&self, endpoint: &E) -> AuthResult<TokenState>
    where
        E: TokenEndpoint + ?Sized,
    {
        self.token_request().send(endpoint).await
    }

    /// Same as [`Self::fetch`]; this grant has no refresh token.
    ///
    /// # Errors
    /// Same as [`Self::fetch`].
    pub async fn refresh<E>(&self, endpoint: &E) -> AuthResult<TokenState>
    where
        E: TokenEndpoint + ?Sized,
    {
        self.fetch(endpoint).await
    }

    /// Blocking [`Self::fetch`].
    ///
    /// # Errors
    /// Same as [`Self::fetch`].
    pub fn fetch_blocking<E>(&self, endpoint: &E) -> AuthResult<TokenState>
    where
        E: BlockingTokenEndpoint + ?Sized,
    {
        self.token_request().send_blocking(endpoint)
    }

    /// Blocking [`Self::refresh`].
    ///
    /// # Errors
    /// Same as [`Self::fetch`].
    pub fn refresh_blocking<E>(&self, endpoint: &E) -> AuthResult<TokenState>
    where
        E: BlockingTokenEndpoint + ?Sized,
    {
        self.fetch_blocking(endpoint)
    }
}

impl GrantFlow for ClientCredentialsFlow {
    fn grant_type(&self) -> GrantType {
        GrantType::ClientCredentials
    }

    fn plan_token(&self, _current: Option<&TokenState>) -> AuthResult<TokenPlan> {
        Ok(TokenPlan::Request(self.token_request()))
    }

    fn plan_refresh(&self, _current: Option<&TokenState>) -> AuthResult<TokenRequest> {
        Ok(self.token_request())
    }
}

impl fmt::Debug for ClientCredentialsFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentialsFlow")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}
