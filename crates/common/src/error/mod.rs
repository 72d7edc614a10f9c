//! Error classification shared by every Basalam error type.
//!
//! Each layer owns its own `thiserror` enum (`AuthError` in this crate,
//! `ApiError` and `BasalamError` downstream). They all implement
//! [`ErrorClassification`] so callers can make retry and alerting decisions
//! without matching on concrete variants.
//!
//! ```rust
//! use basalam_common::error::{ErrorClassification, ErrorSeverity};
//!
//! fn should_page(err: &impl ErrorClassification) -> bool {
//!     err.is_critical() || err.severity() >= ErrorSeverity::Error
//! }
//! # assert!(should_page(&basalam_common::auth::AuthError::NoToken));
//! ```

use std::fmt;

/// Standard interface for classifying errors by their characteristics.
pub trait ErrorClassification {
    /// Whether the same operation may succeed if attempted again.
    ///
    /// Transport failures and 5xx responses are retryable. Rejected
    /// credentials, malformed payloads and missing state are not.
    fn is_retryable(&self) -> bool;

    /// Severity used for logging and alerting decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Whether the error indicates broken configuration or credentials that
    /// will not heal without operator action.
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
