//! Authorization-code grant
//!
//! User-delegated flow:
//! 1. Send the user to [`AuthorizationCodeFlow::authorization_url`].
//! 2. Exchange the code from the redirect with
//!    [`AuthorizationCodeFlow::exchange_code`].
//! 3. Keep the resulting token fresh with
//!    [`AuthorizationCodeFlow::refresh`] / [`AuthorizationCodeFlow::get_token`].
//!
//! The flow is stateless: the most recent token is owned by the caller
//! (normally an `AuthSession`) and passed in by reference.

use std::fmt;

use tracing::debug;

use super::error::{AuthError, AuthResult};
use super::request::{TokenPlan, TokenRequest};
use super::scope::Scope;
use super::traits::{BlockingTokenEndpoint, GrantFlow, TokenEndpoint};
use super::types::{GrantType, TokenFallback, TokenState};

/// Authorization-code flow configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationCodeFlow {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
}

impl AuthorizationCodeFlow {
    /// Create a flow that requests no explicit scope.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scope: String::new(),
        }
    }

    /// Scopes to ask the user for.
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

    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    #[must_use]
    pub fn requested_scope(&self) -> &str {
        &self.scope
    }

    /// Build the URL the user visits to approve access.
    ///
    /// `scope` is included only when non-empty and `state` only when given.
    #[must_use]
    pub fn authorization_url(&self, authorize_url: &str, state: Option<&str>) -> String {
        let mut params = vec![
            ("client_id", self.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        if !self.scope.is_empty() {
            params.push(("scope", self.scope.as_str()));
        }
        if let Some(state) = state {
            params.push(("state", state));
        }

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if authorize_url.contains('?') { '&' } else { '?' };
        format!("{authorize_url}{separator}{query_string}")
    }

    /// Form POSTed to trade an authorization code for a token.
    #[must_use]
    pub fn exchange_request(&self, code: &str) -> TokenRequest {
        TokenRequest::new(GrantType::AuthorizationCode)
            .field("client_id", self.client_id.as_str())
            .field("client_secret", self.client_secret.as_str())
            .field("code", code)
            .field("redirect_uri", self.redirect_uri.as_str())
            .with_fallback(TokenFallback { refresh_token: None, scope: self.requested_fallback() })
    }

    /// Form POSTed to renew `current`.
    ///
    /// # Errors
    /// Returns `AuthError::NoRefreshToken` if there is no current token or it
    /// carries no refresh token.
    pub fn refresh_request(&self, current: Option<&TokenState>) -> AuthResult<TokenRequest> {
        let current = current.ok_or(AuthError::NoRefreshToken)?;
        let refresh_token = current
            .refresh_token()
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::NoRefreshToken)?;

        Ok(TokenRequest::new(GrantType::RefreshToken)
            .field("client_id", self.client_id.as_str())
            .field("client_secret", self.client_secret.as_str())
            .field("refresh_token", refresh_token)
            .with_fallback(TokenFallback {
                refresh_token: Some(refresh_token.to_string()),
                scope: current.scope().map(str::to_string),
            }))
    }

    /// Exchange an authorization code for a token.
    ///
    /// # Errors
    /// Returns an `AuthError` when the endpoint fails or rejects the code.
    pub async fn exchange_code<E>(&self, endpoint: &E, code: &str) -> AuthResult<TokenState>
    where
        E: TokenEndpoint + ?Sized,
    {
        self.exchange_request(code).send(endpoint).await
    }

    /// Renew `current` with its refresh token.
    ///
    /// A response that omits `refresh_token` or `scope` keeps the previous
    /// values.
    ///
    /// # Errors
    /// `NoRefreshToken` without a usable refresh token, otherwise endpoint
    /// errors.
    pub async fn refresh<E>(
        &self,
        endpoint: &E,
        current: Option<&TokenState>,
    ) -> AuthResult<TokenState>
    where
        E: TokenEndpoint + ?Sized,
    {
        self.refresh_request(current)?.send(endpoint).await
    }

    /// Return a usable token, refreshing `current` when it is due.
    ///
    /// # Errors
    /// `NoToken` when no code was ever exchanged, otherwise refresh errors.
    pub async fn get_token<E>(
        &self,
        endpoint: &E,
        current: Option<&TokenState>,
    ) -> AuthResult<TokenState>
    where
        E: TokenEndpoint + ?Sized,
    {
        self.plan_token(current)?.execute(endpoint).await
    }

    /// Blocking [`Self::exchange_code`].
    ///
    /// # Errors
    /// Same as [`Self::exchange_code`].
    pub fn exchange_code_blocking<E>(&self, endpoint: &E, code: &str) -> AuthResult<TokenState>
    where
        E: BlockingTokenEndpoint + ?Sized,
    {
        self.exchange_request(code).send_blocking(endpoint)
    }

    /// Blocking [`Self::refresh`].
    ///
    /// # Errors
    /// Same as [`Self::refresh`].
    pub fn refresh_blocking<E>(
        &self,
        endpoint: &E,
        current: Option<&TokenState>,
    ) -> AuthResult<TokenState>
    where
        E: BlockingTokenEndpoint + ?Sized,
    {
        self.refresh_request(current)?.send_blocking(endpoint)
    }

    /// Blocking [`Self::get_token`].
    ///
    /// # Errors
    /// Same as [`Self::get_token`].
    pub fn get_token_blocking<E>(
        &self,
        endpoint: &E,
        current: Option<&TokenState>,
    ) -> AuthResult<TokenState>
    where
        E: BlockingTokenEndpoint + ?Sized,
    {
        self.plan_token(current)?.execute_blocking(endpoint)
    }

    fn requested_fallback(&self) -> Option<String> {
        (!self.scope.is_empty()).then(|| self.scope.clone())
    }
}

impl GrantFlow for AuthorizationCodeFlow {
    fn grant_type(&self) -> GrantType {
        GrantType::AuthorizationCode
    }

    fn plan_token(&self, current: Option<&TokenState>) -> AuthResult<TokenPlan> {
        let current = current.ok_or(AuthError::NoToken)?;
        if current.should_refresh() && current.refresh_token().is_some() {
            return self.refresh_request(Some(current)).map(TokenPlan::Request);
        }
        if current.should_refresh() {
            debug!("Token is due for refresh but no refresh token was issued; reusing it");
        }
        Ok(TokenPlan::Reuse(current.clone()))
    }

    fn plan_refresh(&self, current: Option<&TokenState>) -> AuthResult<TokenRequest> {
        self.refresh_request(current)
    }
}

impl fmt::Debug for AuthorizationCodeFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationCodeFlow")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::testing::MockTokenEndpoint;

    const AUTHORIZE: &str = "https://basalam.com/accounts/sso";

    fn flow() -> AuthorizationCodeFlow {
        AuthorizationCodeFlow::new("cid", "secret", "https://app.example/cb")
            .with_scopes([Scope::CUSTOMER_ORDER_READ, Scope::CUSTOMER_WALLET_READ])
    }

    fn stale(refresh: Option<&str>) -> TokenState {
        let token = TokenState::new("old", 3600)
            .with_scope("customer.order.read")
            .issued_at(Utc::now() - Duration::seconds(3500));
        match refresh {
            Some(r) => token.with_refresh_token(r),
            None => token,
        }
    }

    #[test]
    fn test_authorization_url_contents() {
        let url = flow().authorization_url(AUTHORIZE, Some("xyz"));
        assert_eq!(
            url,
            "https://basalam.com/accounts/sso?client_id=cid&response_type=code\
             &redirect_uri=https%3A%2F%2Fapp.example%2Fcb\
             &scope=customer.order.read%20customer.wallet.read&state=xyz"
        );
    }

    #[test]
    fn test_authorization_url_omits_empty_scope_and_state() {
        let bare = AuthorizationCodeFlow::new("cid", "secret", "https://app.example/cb");
        let url = bare.authorization_url(AUTHORIZE, None);
        assert!(!url.contains("scope="));
        assert!(!url.contains("state="));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn test_exchange_request_fields() {
        let request = flow().exchange_request("the-code");
        assert_eq!(request.value("grant_type"), Some("authorization_code"));
        assert_eq!(request.value("code"), Some("the-code"));
        assert_eq!(request.value("redirect_uri"), Some("https://app.example/cb"));
        assert_eq!(request.value("client_secret"), Some("secret"));
    }

    #[tokio::test]
    async fn test_get_token_without_exchange_fails() {
        let endpoint = MockTokenEndpoint::new();
        let err = flow().get_token(&endpoint, None).await.unwrap_err();
        assert!(matches!(err, AuthError::NoToken));
        assert_eq!(endpoint.call_count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_fails() {
        let endpoint = MockTokenEndpoint::new();
        let err = flow().refresh(&endpoint, Some(&stale(None))).await.unwrap_err();
        assert!(matches!(err, AuthError::NoRefreshToken));

        let err = flow().refresh(&endpoint, None).await.unwrap_err();
        assert!(matches!(err, AuthError::NoRefreshToken));
        assert_eq!(endpoint.call_count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_carries_forward_refresh_token_and_scope() {
        let endpoint = MockTokenEndpoint::new();
        endpoint.push_token("new", 3600);

        let refreshed = flow().refresh(&endpoint, Some(&stale(Some("r1")))).await.unwrap();

        assert_eq!(refreshed.access_token(), "new");
        assert_eq!(refreshed.refresh_token(), Some("r1"));
        assert_eq!(refreshed.scope(), Some("customer.order.read"));

        let sent = endpoint.last_request().unwrap();
        assert_eq!(sent.value("grant_type"), Some("refresh_token"));
        assert_eq!(sent.value("refresh_token"), Some("r1"));
    }

    #[test]
    fn test_get_token_plans() {
        let fresh = TokenState::new("fresh", 3600).with_refresh_token("r");
        assert_eq!(flow().plan_token(Some(&fresh)).unwrap(), TokenPlan::Reuse(fresh.clone()));

        let due = stale(Some("r"));
        assert!(matches!(flow().plan_token(Some(&due)), Ok(TokenPlan::Request(_))));

        let due_without_refresh = stale(None);
        assert_eq!(
            flow().plan_token(Some(&due_without_refresh)).unwrap(),
            TokenPlan::Reuse(due_without_refresh.clone())
        );
    }

    #[test]
    fn test_exchange_blocking_falls_back_to_requested_scope() {
        let endpoint = MockTokenEndpoint::new();
        endpoint.push_token("tok", 3600);

        let token = flow().exchange_code_blocking(&endpoint, "c").unwrap();
        assert_eq!(token.scope(), Some("customer.order.read customer.wallet.read"));
        assert_eq!(token.refresh_token(), None);
    }
}
