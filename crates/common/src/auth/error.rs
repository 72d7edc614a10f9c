//! Authentication errors

use thiserror::Error;

use super::types::{GrantType, OAuthError};
use crate::error::{ErrorClassification, ErrorSeverity};

/// Errors raised while acquiring, refreshing or validating tokens
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint could not be reached
    #[error("{grant} token request failed: {source}")]
    Transport {
        grant: GrantType,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client for the token endpoint could not be built
    #[error("token endpoint client could not be built: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The token endpoint answered with a non-success status
    #[error("{grant} token request rejected with status {status}{}", describe(.error.as_ref()))]
    Rejected { grant: GrantType, status: u16, error: Option<OAuthError> },

    /// The token endpoint answered 2xx with an unusable body
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    #[error("no refresh token available")]
    NoRefreshToken,

    #[error("no token available; exchange an authorization code first")]
    NoToken,

    #[error("missing required scopes: {}", .0.join(", "))]
    MissingScopes(Vec<String>),

    /// A resource server still rejected the request after a token refresh
    #[error("request unauthorized after token refresh: {0}")]
    Unauthorized(String),

    #[error("{operation} is not supported by the {grant} flow")]
    UnsupportedGrant { operation: &'static str, grant: GrantType },
}

fn describe(error: Option<&OAuthError>) -> String {
    error.map(|e| format!(" ({e})")).unwrap_or_default()
}

/// Result alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// HTTP status behind this error, when there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            _ => None,
        }
    }
}

impl ErrorClassification for AuthError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Transport { .. } => ErrorSeverity::Warning,
            Self::Rejected { status, .. } if *status >= 500 => ErrorSeverity::Warning,
            Self::Rejected { .. } | Self::Unauthorized(_) => ErrorSeverity::Critical,
            Self::ClientBuild(_) => ErrorSeverity::Critical,
            Self::UnsupportedGrant { .. } | Self::InvalidResponse(_) => ErrorSeverity::Error,
            Self::NoRefreshToken | Self::NoToken | Self::MissingScopes(_) => ErrorSeverity::Error,
        }
    }
}
