//! OAuth 2.0 token types
//!
//! Defines the token snapshot held by a session, the wire shapes returned by
//! the authorization server's token endpoint, and the grant identifiers.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::{AuthError, AuthResult};

/// Token type assumed when the server omits `token_type`.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Lifetime assumed when the server omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// A token is due for refresh this many seconds before it expires.
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// OAuth 2.0 grant types understood by the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    /// Server-to-server grant using only the client's own credentials.
    ClientCredentials,
    /// Exchange of a user-approved authorization code.
    AuthorizationCode,
    /// Renewal using a previously issued refresh token.
    RefreshToken,
}

impl GrantType {
    /// Wire value sent as the `grant_type` form field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientCredentials => "client_credentials",
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of one issued access token.
///
/// Expiry predicates are derived from `issued_at + expires_in` at query time
/// and are never cached. A session replaces its `TokenState` wholesale; there
/// are no setters once a value has been handed out.
///
/// Serializable so applications can persist a token and restore it into a
/// fresh session later.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    issued_at: DateTime<Utc>,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}

fn checked_expiry(issued_at: DateTime<Utc>, expires_in: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(expires_in).and_then(|lifetime| issued_at.checked_add_signed(lifetime))
}

const fn default_expires_in() -> i64 {
    DEFAULT_EXPIRES_IN_SECS
}

impl TokenState {
    /// Create a bearer token issued now.
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires_in: i64) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            issued_at: Utc::now(),
            expires_in,
            refresh_token: None,
            scope: None,
        }
    }

    /// Override the token type (defaults to `Bearer`).
    #[must_use]
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = token_type.into();
        self
    }

    /// Attach a refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Attach the space-separated granted scope string.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Pin the capture time. Mostly useful for deterministic tests and for
    /// rebuilding a persisted token.
    #[must_use]
    pub const fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = issued_at;
        self
    }

    /// Build a token from a token-endpoint response body.
    ///
    /// Missing optional fields take the defaults (`Bearer`, 3600 seconds).
    /// `refresh_token` and `scope` fall back to the grant-specific values in
    /// `fallback` when the server omits them.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidResponse` if `access_token` is absent or
    /// empty.
    pub fn from_response(
        response: TokenResponse,
        fallback: &TokenFallback,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<Self> {
        let access_token = response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::InvalidResponse("missing access_token".to_string()))?;

        let expires_in = response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        if checked_expiry(issued_at, expires_in).is_none() {
            return Err(AuthError::InvalidResponse(format!(
                "expires_in out of range: {expires_in}"
            )));
        }

        Ok(Self {
            access_token,
            token_type: response
                .token_type
                .filter(|kind| !kind.is_empty())
                .unwrap_or_else(default_token_type),
            issued_at,
            expires_in,
            refresh_token: response.refresh_token.or_else(|| fallback.refresh_token.clone()),
            scope: response.scope.or_else(|| fallback.scope.clone()),
        })
    }

    /// Opaque access token value.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Token type, normally `Bearer`.
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Instant the token was captured.
    #[must_use]
    pub const fn issued_at_time(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Lifetime in seconds as reported by the server.
    #[must_use]
    pub const fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Refresh token, if the grant issued one.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Raw space-separated scope string.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// `issued_at + expires_in`, clamped to the representable range.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        checked_expiry(self.issued_at, self.expires_in).unwrap_or(if self.expires_in < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }

    /// Whether the token is past its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// [`Self::is_expired`] evaluated at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// Whether the token is inside the refresh margin (or already expired).
    #[must_use]
    pub fn should_refresh(&self) -> bool {
        self.should_refresh_at(Utc::now())
    }

    /// [`Self::should_refresh`] evaluated at `now`. The boundary is inclusive.
    #[must_use]
    pub fn should_refresh_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at()
            .checked_sub_signed(Duration::seconds(REFRESH_MARGIN_SECS))
            .map_or(true, |due| now >= due)
    }

    /// Seconds left before expiry (negative once expired).
    #[must_use]
    pub fn seconds_until_expiry(&self) -> i64 {
        self.seconds_until_expiry_at(Utc::now())
    }

    /// [`Self::seconds_until_expiry`] evaluated at `now`.
    #[must_use]
    pub fn seconds_until_expiry_at(&self, now: DateTime<Utc>) -> i64 {
        self.expires_at().signed_duration_since(now).num_seconds()
    }

    /// Granted scopes as a set.
    #[must_use]
    pub fn granted_scopes(&self) -> HashSet<String> {
        self.scopes().map(str::to_string).collect()
    }

    /// Whether `scope` was granted. Accepts a `Scope` or any string.
    #[must_use]
    pub fn has_scope(&self, scope: impl AsRef<str>) -> bool {
        let wanted = scope.as_ref();
        self.scopes().any(|granted| granted == wanted)
    }

    /// Value of the outgoing `Authorization` header.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.as_deref().unwrap_or_default().split_whitespace()
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("issued_at", &self.issued_at)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("scope", &self.scope)
            .finish()
    }
}

/// Values carried into a new token when the server omits them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFallback {
    /// Refresh token to keep when the response has none.
    pub refresh_token: Option<String>,
    /// Scope string to keep when the response has none.
    pub scope: Option<String>,
}

/// OAuth token response from the authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749). Every field is
/// optional on the wire; [`TokenState::from_response`] enforces the
/// required ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// OAuth error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}
