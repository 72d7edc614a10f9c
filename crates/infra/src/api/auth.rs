//! Authorization source for the dispatchers
//!
//! The dispatchers only need two things from authentication: the current
//! `Authorization` header value, and a way to force a new one after a 401.

use async_trait::async_trait;
use basalam_common::auth::{AuthSession, BlockingAuthSession};
use tracing::info;

use super::errors::ApiResult;

/// Trait for providing access tokens
///
/// Implemented by [`AuthSession`]; tests substitute scripted providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Header value for the next request, acquiring or refreshing as needed.
    async fn authorization_header(&self) -> ApiResult<String>;

    /// Replace the current token unconditionally and return the new header
    /// value.
    async fn reauthorize(&self) -> ApiResult<String>;
}

/// Blocking counterpart of [`AccessTokenProvider`]
pub trait BlockingAccessTokenProvider: Send + Sync {
    fn authorization_header(&self) -> ApiResult<String>;

    fn reauthorize(&self) -> ApiResult<String>;
}

#[async_trait]
impl AccessTokenProvider for AuthSession {
    async fn authorization_header(&self) -> ApiResult<String> {
        Ok(self.authorization().await?)
    }

    async fn reauthorize(&self) -> ApiResult<String> {
        let token = self.force_refresh().await?;
        info!(expires_in = token.expires_in(), "Access token replaced after rejection");
        Ok(token.authorization_value())
    }
}

impl BlockingAccessTokenProvider for BlockingAuthSession {
    fn authorization_header(&self) -> ApiResult<String> {
        Ok(self.authorization()?)
    }

    fn reauthorize(&self) -> ApiResult<String> {
        let token = self.force_refresh()?;
        info!(expires_in = token.expires_in(), "Access token replaced after rejection");
        Ok(token.authorization_value())
    }
}
