//! Per-service facades.
//!
//! Each service maps its operations onto [`ApiRequest`](crate::api::ApiRequest)s
//! and decodes the typed responses. Request shapes are shared between the
//! async and blocking variants.

pub mod chat_service;
pub mod core_service;
pub mod wallet_service;
pub mod webhook_service;

pub use chat_service::{BlockingChatService, ChatService};
pub use core_service::{BlockingCoreService, CoreService};
pub use wallet_service::{BlockingWalletService, WalletService};
pub use webhook_service::{BlockingWebhookService, WebhookService};
