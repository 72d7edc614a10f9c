//! Webhook service types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Service that publishes events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResource {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceListResource {
    pub data: Vec<ServiceResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResource {
    pub id: i64,
    pub service_id: i64,
    pub url: String,
    pub event_ids: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookListResource {
    pub data: Vec<WebhookResource>,
}

/// Subscribe `url` to a set of events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWebhookRequest {
    pub service_id: i64,
    pub url: String,
    pub event_ids: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl CreateWebhookRequest {
    pub fn new(service_id: i64, url: impl Into<String>, event_ids: Vec<String>) -> Self {
        Self { service_id, url: url.into(), event_ids, is_active: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub service_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventListResource {
    pub data: Vec<EventResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteWebhookResponse {
    pub id: i64,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_to_active() {
        let request: CreateWebhookRequest = serde_json::from_str(
            r#"{"service_id":3,"url":"https://hooks.example/in","event_ids":["order.created"]}"#,
        )
        .unwrap();
        assert!(request.is_active);
        assert_eq!(
            request,
            CreateWebhookRequest::new(3, "https://hooks.example/in", vec!["order.created".into()])
        );
    }
}
