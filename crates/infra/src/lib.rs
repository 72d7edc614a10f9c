//! # Basalam Infrastructure
//!
//! HTTP side of the Basalam client.
//!
//! This crate contains:
//! - The request dispatcher with single refresh-and-retry on 401
//! - The `reqwest` transport, async and blocking
//! - Per-service facades (core, wallet, webhook, chat)
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Token lifecycle lives in `basalam-common`; this crate consumes it through
//!   [`api::AccessTokenProvider`]
//! - Resource types and configuration come from `basalam-domain`

pub mod api;
pub mod client;
pub mod config;
pub mod http;
pub mod services;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, ApiErrorKind, ApiRequest, ApiResult, BlockingApiClient};
pub use client::{BasalamClient, BlockingBasalamClient};
pub use services::*;
