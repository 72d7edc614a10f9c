//! Shared building blocks for the Basalam client crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error classification
//! - `runtime`: async plumbing and tracing
//! - `platform`: the OAuth token lifecycle (`auth`)
//! - `test-utils`: scripted token endpoints for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{
    AuthError, AuthResult, AuthSession, BlockingAuthSession, CredentialStrategy, Scope,
    TokenState,
};
#[cfg(feature = "foundation")]
pub use error::{ErrorClassification, ErrorSeverity};
