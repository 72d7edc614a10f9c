//! Resource request dispatch
//!
//! Turns [`ApiRequest`]s into authenticated HTTP calls against one service
//! and classifies the outcome into [`ApiError`] kinds.
//!
//! # Architecture
//!
//! - [`ApiClient`] (async) and [`BlockingApiClient`] share everything except
//!   the I/O call: request shape, response interpretation, and the
//!   refresh-and-retry decision ([`ReauthPolicy`])
//! - Credentials come from an [`AccessTokenProvider`], normally an
//!   `AuthSession`
//! - A 401 triggers exactly one token refresh and one resend; nothing else
//!   is retried here

pub mod auth;
pub mod blocking;
pub mod client;
pub mod errors;
pub mod request;
pub mod response;
pub mod retry;

pub use auth::{AccessTokenProvider, BlockingAccessTokenProvider};
pub use blocking::BlockingApiClient;
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::{ApiError, ApiErrorKind, ApiResult};
pub use request::ApiRequest;
pub use retry::{Attempt, ReauthPolicy};
