//! Platform constants
//!
//! Endpoint hosts and client defaults shared by configuration and the HTTP
//! layer.

// Authorization server
pub const PRODUCTION_TOKEN_URL: &str = "https://auth.basalam.com/oauth/token";
pub const PRODUCTION_AUTHORIZE_URL: &str = "https://basalam.com/accounts/sso";
pub const DEVELOPMENT_TOKEN_URL: &str = "https://auth.basalam.dev/oauth/token";
pub const DEVELOPMENT_AUTHORIZE_URL: &str = "https://basalam.dev/accounts/sso";

// Service hosts are `https://{subdomain}.{domain}`
pub const PRODUCTION_DOMAIN: &str = "basalam.com";
pub const DEVELOPMENT_DOMAIN: &str = "basalam.dev";

// Client defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("basalam-rust-sdk/", env!("CARGO_PKG_VERSION"));

/// Header identifying the operator acting on a wallet on behalf of a user.
pub const OPERATOR_ID_HEADER: &str = "x-operator-id";
