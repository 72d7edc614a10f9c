//! Token sessions with lazy refresh
//!
//! A session owns at most one [`TokenState`] for one
//! [`CredentialStrategy`]:
//! - starts empty, populated on first use, code exchange or restore
//! - refreshed lazily when the cached token enters the refresh margin
//! - replaced wholesale on every successful acquisition
//!
//! [`AuthSession`] performs token I/O asynchronously and
//! [`BlockingAuthSession`] synchronously. Both drive the same decision logic
//! in `SessionCore`.
//!
//! The cached token sits behind a `parking_lot::RwLock` that is only held for
//! the duration of a clone or a swap, never across a network call. A new
//! token is fully built before the single write that installs it, so a
//! cancelled refresh leaves the previous token in place. Concurrent
//! refreshes are not deduplicated; the last successful one wins.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::error::{AuthError, AuthResult};
use super::request::{TokenPlan, TokenRequest};
use super::strategy::CredentialStrategy;
use super::traits::{BlockingTokenEndpoint, GrantFlow, TokenEndpoint};
use super::types::TokenState;

/// Authorization page used when none is configured.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://basalam.com/accounts/sso";

/// Header carrying the access token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Observable lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// Nothing acquired yet (or cleared).
    NoToken,
    /// A token is cached and outside the refresh margin.
    Valid,
    /// A token is cached but due for refresh.
    NeedsRefresh,
}

#[derive(Debug)]
struct SessionCore {
    strategy: CredentialStrategy,
    authorize_url: RwLock<String>,
    current: RwLock<Option<TokenState>>,
}

impl SessionCore {
    fn new(strategy: CredentialStrategy) -> Self {
        Self {
            strategy,
            authorize_url: RwLock::new(DEFAULT_AUTHORIZE_URL.to_string()),
            current: RwLock::new(None),
        }
    }

    fn snapshot(&self) -> Option<TokenState> {
        self.current.read().clone()
    }

    fn install(&self, token: TokenState) -> TokenState {
        info!(
            grant = %self.strategy.grant_type(),
            expires_in_secs = token.seconds_until_expiry(),
            "Access token installed"
        );
        *self.current.write() = Some(token.clone());
        token
    }

    fn clear(&self) {
        *self.current.write() = None;
    }

    /// Plan for a header-ready token: reuse a fresh one, refresh a due one,
    /// or run the initial acquisition when nothing is cached.
    fn usable_plan(&self) -> AuthResult<TokenPlan> {
        match self.snapshot() {
            Some(token) if !token.should_refresh() => Ok(TokenPlan::Reuse(token)),
            Some(token) => {
                debug!("Cached token is inside the refresh margin");
                self.strategy.plan_refresh(Some(&token)).map(TokenPlan::Request)
            }
            None => self.strategy.plan_token(None),
        }
    }

    fn refresh_request(&self) -> AuthResult<TokenRequest> {
        let current = self.snapshot();
        self.strategy.plan_refresh(current.as_ref())
    }

    fn exchange_request(&self, code: &str) -> AuthResult<TokenRequest> {
        self.strategy
            .as_authorization_code()
            .map(|flow| flow.exchange_request(code))
            .ok_or(AuthError::UnsupportedGrant {
                operation: "exchange_code",
                grant: self.strategy.grant_type(),
            })
    }

    fn authorization_url(&self, state: Option<&str>) -> AuthResult<String> {
        self.strategy
            .as_authorization_code()
            .map(|flow| flow.authorization_url(&self.authorize_url.read(), state))
            .ok_or(AuthError::UnsupportedGrant {
                operation: "authorization_url",
                grant: self.strategy.grant_type(),
            })
    }

    fn set_authorize_url(&self, authorize_url: String) {
        *self.authorize_url.write() = authorize_url;
    }

    fn finish(&self, plan_was_request: bool, token: TokenState) -> TokenState {
        if plan_was_request {
            self.install(token)
        } else {
            token
        }
    }

    fn status(&self) -> TokenStatus {
        match self.current.read().as_ref() {
            None => TokenStatus::NoToken,
            Some(token) if token.should_refresh() => TokenStatus::NeedsRefresh,
            Some(_) => TokenStatus::Valid,
        }
    }

    fn has_scope(&self, scope: &str) -> bool {
        self.current.read().as_ref().is_some_and(|token| token.has_scope(scope))
    }

    fn granted_scopes(&self) -> HashSet<String> {
        self.current.read().as_ref().map(TokenState::granted_scopes).unwrap_or_default()
    }

    fn validate_scopes<S: AsRef<str>>(&self, required: &[S]) -> AuthResult<()> {
        let guard = self.current.read();
        let token = guard.as_ref().ok_or(AuthError::NoToken)?;

        let missing: Vec<String> = required
            .iter()
            .map(|scope| AsRef::<str>::as_ref(scope))
            .filter(|scope| !token.has_scope(scope))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::MissingScopes(missing))
        }
    }
}

fn header_map(token: &TokenState) -> HashMap<String, String> {
    HashMap::from([(AUTHORIZATION_HEADER.to_string(), token.authorization_value())])
}

/// Async token session.
///
/// Cheap to clone; clones share the cached token.
#[derive(Clone)]
pub struct AuthSession {
    core: Arc<SessionCore>,
    endpoint: Arc<dyn TokenEndpoint>,
}

impl AuthSession {
    /// Create an empty session.
    pub fn new(strategy: impl Into<CredentialStrategy>, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        Self { core: Arc::new(SessionCore::new(strategy.into())), endpoint }
    }

    /// Override the authorization page used by [`Self::authorization_url`].
    ///
    /// The override is shared with every clone of this session.
    #[must_use]
    pub fn with_authorize_url(self, authorize_url: impl Into<String>) -> Self {
        self.core.set_authorize_url(authorize_url.into());
        self
    }

    #[must_use]
    pub fn strategy(&self) -> &CredentialStrategy {
        &self.core.strategy
    }

    /// A usable token, acquiring or refreshing it if necessary.
    ///
    /// # Errors
    /// Propagates flow and token endpoint errors. The cached token is left
    /// untouched on failure.
    pub async fn token(&self) -> AuthResult<TokenState> {
        let plan = self.core.usable_plan()?;
        let is_request = matches!(plan, TokenPlan::Request(_));
        let token = plan.execute(self.endpoint.as_ref()).await?;
        Ok(self.core.finish(is_request, token))
    }

    /// `{"Authorization": "<token_type> <access_token>"}` for a usable token.
    ///
    /// # Errors
    /// Same as [`Self::token`].
    pub async fn get_auth_headers(&self) -> AuthResult<HashMap<String, String>> {
        self.token().await.map(|token| header_map(&token))
    }

    /// Value of the `Authorization` header for a usable token.
    ///
    /// # Errors
    /// Same as [`Self::token`].
    pub async fn authorization(&self) -> AuthResult<String> {
        self.token().await.map(|token| token.authorization_value())
    }

    /// Unconditionally renew the token and cache the result.
    ///
    /// # Errors
    /// `NoRefreshToken` for an authorization-code session without a refresh
    /// token, otherwise token endpoint errors.
    pub async fn force_refresh(&self) -> AuthResult<TokenState> {
        let request = self.core.refresh_request()?;
        let token = request.send(self.endpoint.as_ref()).await?;
        Ok(self.core.install(token))
    }

    /// Exchange an authorization code and cache the resulting token.
    ///
    /// # Errors
    /// `UnsupportedGrant` for client-credentials sessions, otherwise token
    /// endpoint errors.
    pub async fn exchange_code(&self, code: &str) -> AuthResult<TokenState> {
        let request = self.core.exchange_request(code)?;
        let token = request.send(self.endpoint.as_ref()).await?;
        Ok(self.core.install(token))
    }

    /// URL the user visits to approve an authorization-code session.
    ///
    /// # Errors
    /// `UnsupportedGrant` for client-credentials sessions.
    pub fn authorization_url(&self, state: Option<&str>) -> AuthResult<String> {
        self.core.authorization_url(state)
    }

    /// Snapshot of the cached token without refreshing it.
    #[must_use]
    pub fn current_token(&self) -> Option<TokenState> {
        self.core.snapshot()
    }

    /// Install a previously persisted token.
    pub fn restore(&self, token: TokenState) {
        self.core.install(token);
    }

    /// Drop the cached token.
    pub fn clear(&self) {
        self.core.clear();
    }

    #[must_use]
    pub fn status(&self) -> TokenStatus {
        self.core.status()
    }

    /// Whether the cached token grants `scope`; `false` with no token.
    #[must_use]
    pub fn has_scope(&self, scope: impl AsRef<str>) -> bool {
        self.core.has_scope(scope.as_ref())
    }

    /// Scopes granted to the cached token; empty with no token.
    #[must_use]
    pub fn granted_scopes(&self) -> HashSet<String> {
        self.core.granted_scopes()
    }

    /// Check that every scope in `required` was granted.
    ///
    /// # Errors
    /// `NoToken` when nothing is cached, `MissingScopes` listing every
    /// scope that was not granted.
    pub fn validate_scopes<S: AsRef<str>>(&self, required: &[S]) -> AuthResult<()> {
        self.core.validate_scopes(required)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession").field("core", &self.core).finish_non_exhaustive()
    }
}

/// Blocking token session.
///
/// Same contract as [`AuthSession`], with synchronous token I/O.
#[derive(Clone)]
pub struct BlockingAuthSession {
    core: Arc<SessionCore>,
    endpoint: Arc<dyn BlockingTokenEndpoint>,
}

impl BlockingAuthSession {
    /// Create an empty session.
    pub fn new(
        strategy: impl Into<CredentialStrategy>,
        endpoint: Arc<dyn BlockingTokenEndpoint>,
    ) -> Self {
        Self { core: Arc::new(SessionCore::new(strategy.into())), endpoint }
    }

    /// Override the authorization page used by [`Self::authorization_url`].
    ///
    /// The override is shared with every clone of this session.
    #[must_use]
    pub fn with_authorize_url(self, authorize_url: impl Into<String>) -> Self {
        self.core.set_authorize_url(authorize_url.into());
        self
    }

    #[must_use]
    pub fn strategy(&self) -> &CredentialStrategy {
        &self.core.strategy
    }

    /// See [`AuthSession::token`].
    ///
    /// # Errors
    /// Same as [`AuthSession::token`].
    pub fn token(&self) -> AuthResult<TokenState> {
        let plan = self.core.usable_plan()?;
        let is_request = matches!(plan, TokenPlan::Request(_));
        let token = plan.execute_blocking(self.endpoint.as_ref())?;
        Ok(self.core.finish(is_request, token))
    }

    /// See [`AuthSession::get_auth_headers`].
    ///
    /// # Errors
    /// Same as [`AuthSession::token`].
    pub fn get_auth_headers(&self) -> AuthResult<HashMap<String, String>> {
        self.token().map(|token| header_map(&token))
    }

    /// See [`AuthSession::authorization`].
    ///
    /// # Errors
    /// Same as [`AuthSession::token`].
    pub fn authorization(&self) -> AuthResult<String> {
        self.token().map(|token| token.authorization_value())
    }

    /// See [`AuthSession::force_refresh`].
    ///
    /// # Errors
    /// Same as [`AuthSession::force_refresh`].
    pub fn force_refresh(&self) -> AuthResult<TokenState> {
        let request = self.core.refresh_request()?;
        let token = request.send_blocking(self.endpoint.as_ref())?;
        Ok(self.core.install(token))
    }

    /// See [`AuthSession::exchange_code`].
    ///
    /// # Errors
    /// Same as [`AuthSession::exchange_code`].
    pub fn exchange_code(&self, code: &str) -> AuthResult<TokenState> {
        let request = self.core.exchange_request(code)?;
        let token = request.send_blocking(self.endpoint.as_ref())?;
        Ok(self.core.install(token))
    }

    /// See [`AuthSession::authorization_url`].
    ///
    /// # Errors
    /// `UnsupportedGrant` for client-credentials sessions.
    pub fn authorization_url(&self, state: Option<&str>) -> AuthResult<String> {
        self.core.authorization_url(state)
    }

    #[must_use]
    pub fn current_token(&self) -> Option<TokenState> {
        self.core.snapshot()
    }

    pub fn restore(&self, token: TokenState) {
        self.core.install(token);
    }

    pub fn clear(&self) {
        self.core.clear();
    }

    #[must_use]
    pub fn status(&self) -> TokenStatus {
        self.core.status()
    }

    #[must_use]
    pub fn has_scope(&self, scope: impl AsRef<str>) -> bool {
        self.core.has_scope(scope.as_ref())
    }

    #[must_use]
    pub fn granted_scopes(&self) -> HashSet<String> {
        self.core.granted_scopes()
    }

    /// See [`AuthSession::validate_scopes`].
    ///
    /// # Errors
    /// Same as [`AuthSession::validate_scopes`].
    pub fn validate_scopes<S: AsRef<str>>(&self, required: &[S]) -> AuthResult<()> {
        self.core.validate_scopes(required)
    }
}

impl std::fmt::Debug for BlockingAuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingAuthSession").field("core", &self.core).finish_non_exhaustive()
    }
}
