//! API client with single refresh-and-retry on 401
//!
//! Sends [`ApiRequest`]s to one service with authentication applied. When the
//! service rejects the token, the client replaces it once and resends the
//! identical request.

use std::sync::Arc;
use std::time::Duration;

use basalam_common::auth::AUTHORIZATION_HEADER;
use basalam_domain::constants::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::auth::AccessTokenProvider;
use super::errors::{ApiError, ApiResult};
use super::request::ApiRequest;
use super::response::{decode, interpret, unauthorized};
use super::retry::{Attempt, ReauthPolicy};
use crate::http::{HttpClient, RawResponse};

/// Configuration for API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// Service base URL (e.g., "https://core.basalam.com")
    pub base_url: String,
    /// Timeout for each HTTP call
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://core.basalam.com".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ApiClientConfig {
    pub(crate) fn validated_base(&self) -> ApiResult<String> {
        Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {}: {e}", self.base_url)))?;
        Ok(self.base_url.trim_end_matches('/').to_string())
    }
}

/// Async request dispatcher for one service
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the base URL is invalid or the HTTP
    /// client cannot be built
    pub fn new(config: ApiClientConfig, auth: Arc<dyn AccessTokenProvider>) -> ApiResult<Self> {
        let base_url = config.validated_base()?;
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_header("Accept", "application/json")
            .build()?;
        Ok(Self { http, auth, base_url })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Same transport and credentials, different service.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if `base_url` is invalid
    pub fn for_base_url(&self, base_url: impl Into<String>) -> ApiResult<Self> {
        let config = ApiClientConfig { base_url: base_url.into(), ..ApiClientConfig::default() };
        Ok(Self {
            http: self.http.clone(),
            auth: Arc::clone(&self.auth),
            base_url: config.validated_base()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a request and return its JSON body (`None` when empty)
    ///
    /// # Errors
    ///
    /// - `ApiError::Auth` when no token can be obtained, or the service
    ///   rejects the request again after one refresh
    /// - `ApiError::NotFound` / `ApiError::Api` for other error statuses
    /// - `ApiError::Validation` for malformed success bodies
    /// - `ApiError::Request` for transport failures
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn execute(&self, request: &ApiRequest) -> ApiResult<Option<Value>> {
        let url = request.resolve(&self.base_url)?;
        let mut policy = ReauthPolicy::new();
        let mut authorization = self.auth.authorization_header().await?;

        loop {
            let response = self.send_once(request, &url, &authorization).await?;
            match policy.on_status(response.status) {
                Attempt::Done => return interpret(&response),
                Attempt::RefreshAndRetry => {
                    warn!(
                        path = %request.path(),
                        "Request unauthorized, refreshing token and retrying once"
                    );
                    authorization = self.auth.reauthorize().await?;
                }
                Attempt::GiveUp => {
                    warn!(path = %request.path(), "Request still unauthorized after token refresh");
                    return Err(unauthorized(&response));
                }
            }
        }
    }

    /// Execute a request and deserialize its body into `R`
    ///
    /// # Errors
    ///
    /// As [`ApiClient::execute`]; shape mismatches are `ApiError::Validation`
    pub async fn execute_as<R: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<R> {
        decode(self.execute(request).await?)
    }

    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.execute_as(&ApiRequest::get(path)).await
    }

    /// Execute a POST request with a JSON body
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]
    pub async fn post<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> ApiResult<R> {
        self.execute_as(&ApiRequest::post(path).json(body)?).await
    }

    /// Execute a PUT request with a JSON body
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]
    pub async fn put<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> ApiResult<R> {
        self.execute_as(&ApiRequest::put(path).json(body)?).await
    }

    /// Execute a PATCH request with a JSON body
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]
    pub async fn patch<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> ApiResult<R> {
        self.execute_as(&ApiRequest::patch(path).json(body)?).await
    }

    /// Execute a DELETE request
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.execute_as(&ApiRequest::delete(path)).await
    }

    async fn send_once(
        &self,
        request: &ApiRequest,
        url: &Url,
        authorization: &str,
    ) -> ApiResult<RawResponse> {
        let mut builder = self.http.request(request.method().clone(), url.clone());
        if !request.query_params().is_empty() {
            builder = builder.query(request.query_params());
        }
        for (name, value) in request.headers() {
            if !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER) {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        builder = builder.header(AUTHORIZATION_HEADER, authorization);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        debug!(method = %request.method(), path = %request.path(), "Dispatching request");
        self.http.send(builder).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    #[must_use]
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the authentication provider
    #[must_use]
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the auth provider is missing or client creation fails
    pub fn build(self) -> ApiResult<ApiClient> {
        let config = self.config.unwrap_or_default();
        let auth = self.auth.ok_or_else(|| ApiError::Config("Auth provider not set".to_string()))?;

        ApiClient::new(config, auth)
    }
}
