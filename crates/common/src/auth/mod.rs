//! OAuth 2.0 token lifecycle for the Basalam platform
//!
//! This module acquires, caches, validates and lazily refreshes bearer tokens
//! for the two grants the platform supports.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ AuthSession          │  cached TokenState + lazy refresh
//! │ BlockingAuthSession  │
//! └──────────┬───────────┘
//!            │
//!            ├──► CredentialStrategy   (GrantFlow: what to request)
//!            │        ├── ClientCredentialsFlow
//!            │        └── AuthorizationCodeFlow
//!            │
//!            └──► TokenEndpoint        (HTTP: how to request it)
//!                     ├── HttpTokenEndpoint
//!                     └── BlockingHttpTokenEndpoint
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use basalam_common::auth::{
//!     AuthSession, ClientCredentialsFlow, HttpTokenEndpoint, Scope, DEFAULT_TOKEN_TIMEOUT,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let flow = ClientCredentialsFlow::new("client-id", "client-secret")
//!         .with_scopes([Scope::VENDOR_PRODUCT_READ, Scope::CUSTOMER_ORDER_READ]);
//!     let endpoint =
//!         HttpTokenEndpoint::new("https://auth.basalam.com/oauth/token", DEFAULT_TOKEN_TIMEOUT)?;
//!
//!     let session = AuthSession::new(flow, Arc::new(endpoint));
//!     let headers = session.get_auth_headers().await?;
//!     session.validate_scopes(&[Scope::VENDOR_PRODUCT_READ])?;
//!     # let _ = headers;
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenState`, wire types and grant identifiers
//! - **[`scope`]**: documented scope registry
//! - **[`request`]**: token request forms and response interpretation
//! - **[`client_credentials`]** / **[`authorization_code`]**: grant flows
//! - **[`client`]**: `reqwest` token endpoints
//! - **[`session`]**: cached sessions

pub mod authorization_code;
pub mod client;
pub mod client_credentials;
mod error;
pub mod request;
pub mod scope;
pub mod session;
pub mod strategy;
pub mod traits;
pub mod types;

pub use authorization_code::AuthorizationCodeFlow;
pub use client::{BlockingHttpTokenEndpoint, HttpTokenEndpoint, DEFAULT_TOKEN_TIMEOUT};
pub use client_credentials::ClientCredentialsFlow;
pub use error::{AuthError, AuthResult};
pub use request::{interpret_response, TokenPlan, TokenRequest};
pub use scope::Scope;
pub use session::{
    AuthSession, BlockingAuthSession, TokenStatus, AUTHORIZATION_HEADER, DEFAULT_AUTHORIZE_URL,
};
pub use strategy::CredentialStrategy;
pub use traits::{BlockingTokenEndpoint, GrantFlow, TokenEndpoint};
pub use types::{
    GrantType, OAuthError, TokenFallback, TokenResponse, TokenState, DEFAULT_EXPIRES_IN_SECS,
    DEFAULT_TOKEN_TYPE, REFRESH_MARGIN_SECS,
};
