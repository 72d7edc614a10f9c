//! Request and response models for the platform services

pub mod chat;
pub mod user;
pub mod wallet;
pub mod webhook;

pub use chat::{
    Attachment, AttachmentFile, CreateChatRequest, MessageInput, MessageOrder, MessageQuery,
    MessageRequest, DEFAULT_MESSAGE_LIMIT,
};
pub use user::PrivateUserResponse;
pub use wallet::{
    BalanceFilter, BooleanResponse, CreditCreationResponse, CreditResponse, CreditTypeResponse,
    HistoryItemResponse, HistoryPaginationResponse, ReasonResponse, ReferenceResponse,
    RefundRequest, RefundResponse, RollbackRefundRequest, SpendCreditRequest, SpendItemResponse,
    SpendResponse,
};
pub use webhook::{
    CreateWebhookRequest, DeleteWebhookResponse, EventListResource, EventResource,
    ServiceListResource, ServiceResource, WebhookListResource, WebhookResource,
};
