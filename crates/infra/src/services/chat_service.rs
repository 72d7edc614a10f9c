//! Chat service
//!
//! Message and conversation payloads vary by message type, so responses are
//! returned as raw JSON.

use basalam_domain::{CreateChatRequest, MessageQuery, MessageRequest};
use serde_json::Value;

use crate::api::{ApiClient, ApiRequest, ApiResult, BlockingApiClient};

fn create_message(request: &MessageRequest) -> ApiResult<ApiRequest> {
    ApiRequest::post("/v2/message").json(request)
}

fn create_chat(request: &CreateChatRequest) -> ApiResult<ApiRequest> {
    ApiRequest::post("/v2/chat").json(request)
}

fn messages(chat_id: i64, query: &MessageQuery) -> ApiRequest {
    ApiRequest::get(format!("/v2/chat/{chat_id}/messages")).query_pairs(query.to_pairs())
}

/// Async chat client
#[derive(Debug, Clone)]
pub struct ChatService {
    api: ApiClient,
}

impl ChatService {
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn create_message(&self, request: &MessageRequest) -> ApiResult<Value> {
        self.api.execute_as(&create_message(request)?).await
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn create_chat(&self, request: &CreateChatRequest) -> ApiResult<Value> {
        self.api.execute_as(&create_chat(request)?).await
    }

    /// Page through a chat's messages; see [`MessageQuery`] for the cursor.
    ///
    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn get_messages(&self, chat_id: i64, query: &MessageQuery) -> ApiResult<Value> {
        self.api.execute_as(&messages(chat_id, query)).await
    }
}

/// Blocking chat client
#[derive(Debug, Clone)]
pub struct BlockingChatService {
    api: BlockingApiClient,
}

impl BlockingChatService {
    pub const fn new(api: BlockingApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn create_message(&self, request: &MessageRequest) -> ApiResult<Value> {
        self.api.execute_as(&create_message(request)?)
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn create_chat(&self, request: &CreateChatRequest) -> ApiResult<Value> {
        self.api.execute_as(&create_chat(request)?)
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn get_messages(&self, chat_id: i64, query: &MessageQuery) -> ApiResult<Value> {
        self.api.execute_as(&messages(chat_id, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_request_carries_cursor() {
        let query = MessageQuery { msg_id: Some(88), ..MessageQuery::default() };
        let request = messages(5, &query);

        assert_eq!(request.path(), "/v2/chat/5/messages");
        assert!(request.query_params().contains(&("msgId".to_string(), "88".to_string())));
        assert!(request.query_params().contains(&("order".to_string(), "DESC".to_string())));
    }
}
