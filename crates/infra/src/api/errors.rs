//! API-specific error types
//!
//! Every failure a resource call can produce, classified by kind so callers
//! can branch without matching on messages.

use basalam_common::auth::AuthError;
use basalam_common::error::{ErrorClassification, ErrorSeverity};
use basalam_domain::BasalamError;
use thiserror::Error;

/// Kinds of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Credentials missing, rejected, or refused after one refresh
    Auth,
    /// Non-success HTTP status other than 401 and 404
    Api,
    /// 404 from a resource endpoint
    NotFound,
    /// Success status with a body that is not the expected JSON
    Validation,
    /// Transport failure; no HTTP status was received
    Request,
    /// Client could not be built from its configuration
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("API error {status} ({code}): {message}")]
    Api { status: u16, code: String, message: String },

    #[error("Resource not found ({code}): {message}")]
    NotFound { code: String, message: String },

    #[error("Invalid response: {0}")]
    Validation(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias for dispatcher and service calls
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub const fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Auth(_) => ApiErrorKind::Auth,
            Self::Api { .. } => ApiErrorKind::Api,
            Self::NotFound { .. } => ApiErrorKind::NotFound,
            Self::Validation(_) => ApiErrorKind::Validation,
            Self::Request(_) => ApiErrorKind::Request,
            Self::Config(_) => ApiErrorKind::Config,
        }
    }

    /// HTTP status behind this error, when one was received.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Auth(err) => err.status(),
            Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Validation(_) | Self::Request(_) | Self::Config(_) => None,
        }
    }

    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

impl ErrorClassification for ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Auth(err) => err.is_retryable(),
            Self::NotFound { .. } | Self::Validation(_) | Self::Config(_) => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Info,
            Self::Request(_) => ErrorSeverity::Warning,
            Self::Api { status, .. } if *status < 500 => ErrorSeverity::Warning,
            Self::Api { .. } | Self::Validation(_) | Self::Auth(_) => ErrorSeverity::Error,
            Self::Config(_) => ErrorSeverity::Critical,
        }
    }
}

impl From<BasalamError> for ApiError {
    fn from(err: BasalamError) -> Self {
        match err {
            BasalamError::Config(message) => Self::Config(message),
            BasalamError::InvalidInput(message) => Self::Validation(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> ApiError {
        ApiError::Api { status, code: status.to_string(), message: "boom".into() }
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ApiError::Auth(AuthError::NoToken).kind(), ApiErrorKind::Auth);
        assert_eq!(api(500).kind(), ApiErrorKind::Api);
        assert_eq!(
            ApiError::NotFound { code: "404".into(), message: "missing".into() }.kind(),
            ApiErrorKind::NotFound
        );
        assert_eq!(ApiError::Validation("bad json".into()).kind(), ApiErrorKind::Validation);
        assert_eq!(ApiError::Request("refused".into()).kind(), ApiErrorKind::Request);
    }

    #[test]
    fn test_status_reporting() {
        assert_eq!(api(503).status(), Some(503));
        let missing = ApiError::NotFound { code: "x".into(), message: "y".into() };
        assert_eq!(missing.status(), Some(404));
        assert_eq!(ApiError::Auth(AuthError::Unauthorized("again".into())).status(), Some(401));
        assert_eq!(ApiError::Request("timeout".into()).status(), None);
    }

    #[test]
    fn test_should_retry() {
        assert!(ApiError::Request("reset".into()).is_retryable());
        assert!(api(502).is_retryable());
        assert!(api(429).is_retryable());
        assert!(!api(400).is_retryable());
        assert!(!ApiError::Validation("x".into()).is_retryable());
        assert!(ApiError::Config("x".into()).is_critical());
    }

    #[test]
    fn test_auth_error_converts() {
        let err: ApiError = AuthError::NoRefreshToken.into();
        assert!(err.is_auth());
        assert!(err.to_string().starts_with("Authentication failed"));
    }

    #[test]
    fn test_domain_error_converts() {
        let err: ApiError = BasalamError::Config("bad url".into()).into();
        assert_eq!(err.kind(), ApiErrorKind::Config);
    }
}
