//! Blocking API client
//!
//! Same contract as [`ApiClient`](super::client::ApiClient) on
//! `reqwest::blocking`: one refresh-and-retry on 401, identical error
//! classification. Must not be used from inside an async runtime.

use std::sync::Arc;

use basalam_common::auth::AUTHORIZATION_HEADER;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::auth::BlockingAccessTokenProvider;
use super::client::ApiClientConfig;
use super::errors::ApiResult;
use super::request::ApiRequest;
use super::response::{decode, interpret, unauthorized};
use super::retry::{Attempt, ReauthPolicy};
use crate::http::{BlockingHttpClient, RawResponse};

/// Blocking request dispatcher for one service
#[derive(Clone)]
pub struct BlockingApiClient {
    http: BlockingHttpClient,
    auth: Arc<dyn BlockingAccessTokenProvider>,
    base_url: String,
}

impl BlockingApiClient {
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the base URL is invalid or the HTTP
    /// client cannot be built
    pub fn new(
        config: ApiClientConfig,
        auth: Arc<dyn BlockingAccessTokenProvider>,
    ) -> ApiResult<Self> {
        let base_url = config.validated_base()?;
        let http = BlockingHttpClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_header("Accept", "application/json")
            .build_blocking()?;
        Ok(Self { http, auth, base_url })
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
    /// See [`ApiClient::execute`](super::client::ApiClient::execute)
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub fn execute(&self, request: &ApiRequest) -> ApiResult<Option<Value>> {
        let url = request.resolve(&self.base_url)?;
        let mut policy = ReauthPolicy::new();
        let mut authorization = self.auth.authorization_header()?;

        loop {
            let response = self.send_once(request, &url, &authorization)?;
            match policy.on_status(response.status) {
                Attempt::Done => return interpret(&response),
                Attempt::RefreshAndRetry => {
                    warn!(
                        path = %request.path(),
                        "Request unauthorized, refreshing token and retrying once"
                    );
                    authorization = self.auth.reauthorize()?;
                }
                Attempt::GiveUp => {
                    warn!(path = %request.path(), "Request still unauthorized after token refresh");
                    return Err(unauthorized(&response));
                }
            }
        }
    }

    /// # Errors
    ///
    /// As [`BlockingApiClient::execute`]; shape mismatches are
    /// `ApiError::Validation`
    pub fn execute_as<R: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<R> {
        decode(self.execute(request)?)
    }

    /// # Errors
    ///
    /// See [`BlockingApiClient::execute`]
    pub fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.execute_as(&ApiRequest::get(path))
    }

    /// # Errors
    ///
    /// See [`BlockingApiClient::execute`]
    pub fn post<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> ApiResult<R> {
        self.execute_as(&ApiRequest::post(path).json(body)?)
    }

    /// # Errors
    ///
    /// See [`BlockingApiClient::execute`]
    pub fn put<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> ApiResult<R> {
        self.execute_as(&ApiRequest::put(path).json(body)?)
    }

    /// # Errors
    ///
    /// See [`BlockingApiClient::execute`]
    pub fn patch<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> ApiResult<R> {
        self.execute_as(&ApiRequest::patch(path).json(body)?)
    }

    /// # Errors
    ///
    /// See [`BlockingApiClient::execute`]
    pub fn delete<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.execute_as(&ApiRequest::delete(path))
    }

    fn send_once(
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
        self.http.send(builder)
    }
}

impl std::fmt::Debug for BlockingApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
