//! # Basalam Domain
//!
//! Data types shared by the Basalam client crates.
//!
//! This crate contains:
//! - Client configuration (environments, service hosts, timeouts)
//! - Request and response models for the platform services
//! - Domain error types and Result definitions
//! - Platform constants
//!
//! ## Architecture
//! - No dependencies on other Basalam crates
//! - No I/O; pure data and validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::{BasalamConfig, Environment, Service};
pub use errors::*;
pub use types::*;
