//! Chat service types
//!
//! Chat responses are loosely shaped and returned as raw JSON; only the
//! request side is typed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Default page size for message listing
pub const DEFAULT_MESSAGE_LIMIT: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentFile {
    pub id: i64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_hash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<AttachmentFile>>,
}

/// Message to post into an existing chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub chat_id: i64,
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_metadata: Option<HashMap<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_id: Option<i64>,
}

impl MessageRequest {
    /// Plain text message.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_type: "text".to_string(),
            message_source: None,
            message: Some(MessageInput { text: Some(text.into()), entity_id: None }),
            attachment: None,
            replied_message_id: None,
            message_metadata: None,
            temp_id: None,
        }
    }
}

/// Open a chat with another user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChatRequest {
    pub user_id: i64,
    pub chat_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_metadata: Option<HashMap<String, serde_json::Value>>,
}

impl CreateChatRequest {
    #[must_use]
    pub fn private(user_id: i64) -> Self {
        Self { user_id, chat_type: "PRIVATE".to_string(), chat_metadata: None }
    }
}

/// Ordering of listed messages relative to the anchor message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageOrder {
    Asc,
    #[default]
    Desc,
}

impl_domain_status_conversions!(MessageOrder {
    Asc => "asc",
    Desc => "desc",
});

/// Query for `GET /v2/chat/{chat_id}/messages`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageQuery {
    pub limit: u32,
    pub chat_type: String,
    pub order: MessageOrder,
    /// Comparison applied to `msg_id` (`<` lists older messages)
    pub op: String,
    pub msg_id: Option<i64>,
    pub temp_id: Option<i64>,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MESSAGE_LIMIT,
            chat_type: "ALL".to_string(),
            order: MessageOrder::Desc,
            op: "<".to_string(),
            msg_id: None,
            temp_id: None,
        }
    }
}

impl MessageQuery {
    /// Query-string pairs in wire form.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("chatType".to_string(), self.chat_type.clone()),
            ("order".to_string(), self.order.to_string().to_uppercase()),
            ("op".to_string(), self.op.clone()),
        ];
        if let Some(msg_id) = self.msg_id {
            pairs.push(("msgId".to_string(), msg_id.to_string()));
        }
        if let Some(temp_id) = self.temp_id {
            pairs.push(("temp_id".to_string(), temp_id.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_serialization_skips_unset_fields() {
        let value = serde_json::to_value(MessageRequest::text(9, "hello")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "chat_id": 9,
                "message_type": "text",
                "message": { "text": "hello" }
            })
        );
    }

    #[test]
    fn test_default_message_query() {
        let pairs = MessageQuery::default().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "20".to_string()),
                ("chatType".to_string(), "ALL".to_string()),
                ("order".to_string(), "DESC".to_string()),
                ("op".to_string(), "<".to_string()),
            ]
        );
    }

    #[test]
    fn test_message_query_anchor() {
        let query = MessageQuery { msg_id: Some(100), ..MessageQuery::default() };
        assert!(query.to_pairs().contains(&("msgId".to_string(), "100".to_string())));
    }
}
