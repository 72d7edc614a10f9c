//! Traits for grant flows and token endpoints
//!
//! These traits split the token lifecycle into pure decisions (`GrantFlow`)
//! and the HTTP call that carries them out (`TokenEndpoint` for async code,
//! `BlockingTokenEndpoint` for synchronous code). Tests substitute the
//! endpoint with [`crate::testing::MockTokenEndpoint`].

use async_trait::async_trait;

use super::error::AuthResult;
use super::request::{TokenPlan, TokenRequest};
use super::types::{GrantType, TokenResponse, TokenState};

/// Decision logic of one OAuth grant flow.
///
/// Implementations describe *what* to request; they never perform I/O and
/// never store tokens. The caller passes the current token (if any) and
/// executes the returned plan.
pub trait GrantFlow: Send + Sync {
    /// Grant used for the initial acquisition.
    fn grant_type(&self) -> GrantType;

    /// Plan for "give me a usable token" given the current one.
    ///
    /// # Errors
    /// Returns an error when no token can be produced without outside input
    /// (for example an authorization code that was never exchanged).
    fn plan_token(&self, current: Option<&TokenState>) -> AuthResult<TokenPlan>;

    /// Request that unconditionally renews the token.
    ///
    /// # Errors
    /// Returns an error when the flow has nothing to renew with.
    fn plan_refresh(&self, current: Option<&TokenState>) -> AuthResult<TokenRequest>;
}

/// Async transport to the authorization server's token endpoint.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// POST `request` as a form and return the decoded success body.
    ///
    /// # Errors
    /// Returns `AuthError::Transport` when the server is unreachable and
    /// `AuthError::Rejected` for non-success statuses.
    async fn request_token(&self, request: &TokenRequest) -> AuthResult<TokenResponse>;
}

/// Blocking transport to the authorization server's token endpoint.
pub trait BlockingTokenEndpoint: Send + Sync {
    /// POST `request` as a form and return the decoded success body.
    ///
    /// # Errors
    /// Same contract as [`TokenEndpoint::request_token`].
    fn request_token(&self, request: &TokenRequest) -> AuthResult<TokenResponse>;
}
