//! Webhook service
//!
//! Lists publishing services and their events, and manages webhook
//! subscriptions.

use basalam_domain::{
    CreateWebhookRequest, DeleteWebhookResponse, EventListResource, ServiceListResource,
    WebhookListResource, WebhookResource,
};

use crate::api::{ApiClient, ApiRequest, ApiResult, BlockingApiClient};

const SERVICES_PATH: &str = "/v1/services";
const WEBHOOKS_PATH: &str = "/v1/webhooks";
const EVENTS_PATH: &str = "/v1/events";

fn create_webhook(request: &CreateWebhookRequest) -> ApiResult<ApiRequest> {
    ApiRequest::post(WEBHOOKS_PATH).json(request)
}

fn delete_webhook(webhook_id: i64) -> ApiRequest {
    ApiRequest::delete(format!("{WEBHOOKS_PATH}/{webhook_id}"))
}

/// Async webhook client
#[derive(Debug, Clone)]
pub struct WebhookService {
    api: ApiClient,
}

impl WebhookService {
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn get_webhook_services(&self) -> ApiResult<ServiceListResource> {
        self.api.execute_as(&ApiRequest::get(SERVICES_PATH)).await
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn get_webhooks(&self) -> ApiResult<WebhookListResource> {
        self.api.execute_as(&ApiRequest::get(WEBHOOKS_PATH)).await
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn create_webhook(
        &self,
        request: &CreateWebhookRequest,
    ) -> ApiResult<WebhookResource> {
        self.api.execute_as(&create_webhook(request)?).await
    }

    /// # Errors
    /// `ApiError::NotFound` when the webhook does not exist.
    pub async fn delete_webhook(&self, webhook_id: i64) -> ApiResult<DeleteWebhookResponse> {
        self.api.execute_as(&delete_webhook(webhook_id)).await
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub async fn get_webhook_events(&self) -> ApiResult<EventListResource> {
        self.api.execute_as(&ApiRequest::get(EVENTS_PATH)).await
    }
}

/// Blocking webhook client
#[derive(Debug, Clone)]
pub struct BlockingWebhookService {
    api: BlockingApiClient,
}

impl BlockingWebhookService {
    pub const fn new(api: BlockingApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn get_webhook_services(&self) -> ApiResult<ServiceListResource> {
        self.api.execute_as(&ApiRequest::get(SERVICES_PATH))
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn get_webhooks(&self) -> ApiResult<WebhookListResource> {
        self.api.execute_as(&ApiRequest::get(WEBHOOKS_PATH))
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn create_webhook(&self, request: &CreateWebhookRequest) -> ApiResult<WebhookResource> {
        self.api.execute_as(&create_webhook(request)?)
    }

    /// # Errors
    /// `ApiError::NotFound` when the webhook does not exist.
    pub fn delete_webhook(&self, webhook_id: i64) -> ApiResult<DeleteWebhookResponse> {
        self.api.execute_as(&delete_webhook(webhook_id))
    }

    /// # Errors
    /// Propagates dispatcher errors.
    pub fn get_webhook_events(&self) -> ApiResult<EventListResource> {
        self.api.execute_as(&ApiRequest::get(EVENTS_PATH))
    }
}
