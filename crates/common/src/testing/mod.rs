//! Testing utilities and helpers
//!
//! - **[`mocks`]**: scripted token endpoint implementing both the async and
//!   blocking endpoint traits
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use basalam_common::auth::{BlockingAuthSession, ClientCredentialsFlow};
//! use basalam_common::testing::MockTokenEndpoint;
//!
//! let endpoint = MockTokenEndpoint::new();
//! endpoint.push_token("scripted", 3600);
//!
//! let flow = ClientCredentialsFlow::new("id", "secret");
//! let session = BlockingAuthSession::new(flow, Arc::new(endpoint.clone()));
//! assert_eq!(session.authorization().unwrap(), "Bearer scripted");
//! assert_eq!(endpoint.call_count(), 1);
//! ```

pub mod mocks;

pub use mocks::MockTokenEndpoint;
