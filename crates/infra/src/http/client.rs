use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use tracing::debug;

use crate::api::errors::{ApiError, ApiResult};

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub reason: Option<&'static str>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Async HTTP transport with default headers and a per-call timeout.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.client.request(method, url)
    }

    /// Send the request and buffer the whole body.
    ///
    /// # Errors
    /// Transport failures (connect, timeout, body read) map to
    /// `ApiError::Request`.
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> ApiResult<RawResponse> {
        let request = builder.build().map_err(|err| ApiError::Request(err.to_string()))?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, url = %url.path(), "sending HTTP request");

        let response = self.client.execute(request).await.map_err(|err| {
            debug!(%method, url = %url.path(), error = %err, "HTTP request failed");
            transport_error(&method, &url, &err)
        })?;

        let status = response.status();
        debug!(%method, url = %url.path(), %status, "received HTTP response");
        let body = response.bytes().await.map_err(|err| transport_error(&method, &url, &err))?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason(),
            body: body.to_vec(),
        })
    }
}

/// Blocking HTTP transport; same settings as [`HttpClient`].
///
/// Must not be built or dropped inside an async runtime.
#[derive(Clone, Debug)]
pub struct BlockingHttpClient {
    client: reqwest::blocking::Client,
}

impl BlockingHttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn request(&self, method: Method, url: Url) -> reqwest::blocking::RequestBuilder {
        self.client.request(method, url)
    }

    /// Send the request and buffer the whole body.
    ///
    /// # Errors
    /// Transport failures map to `ApiError::Request`.
    pub fn send(&self, builder: reqwest::blocking::RequestBuilder) -> ApiResult<RawResponse> {
        let request = builder.build().map_err(|err| ApiError::Request(err.to_string()))?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, url = %url.path(), "sending HTTP request");

        let response = self.client.execute(request).map_err(|err| {
            debug!(%method, url = %url.path(), error = %err, "HTTP request failed");
            transport_error(&method, &url, &err)
        })?;

        let status = response.status();
        debug!(%method, url = %url.path(), %status, "received HTTP response");
        let body = response.bytes().map_err(|err| transport_error(&method, &url, &err))?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason(),
            body: body.to_vec(),
        })
    }
}

fn transport_error(method: &Method, url: &Url, err: &reqwest::Error) -> ApiError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "could not connect"
    } else {
        "failed"
    };
    ApiError::Request(format!("{method} {url} {kind}: {err}"))
}

/// Builder for [`HttpClient`] and [`BlockingHttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Vec<(String, String)>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), user_agent: None, default_headers: Vec::new() }
    }
}

impl HttpClientBuilder {
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    fn header_map(&self) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Config(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::Config(format!("invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// # Errors
    /// Returns `ApiError::Config` for invalid headers or TLS setup failures.
    pub fn build(&self) -> ApiResult<HttpClient> {
        let mut builder =
            reqwest::Client::builder().timeout(self.timeout).default_headers(self.header_map()?);
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(HttpClient { client })
    }

    /// # Errors
    /// Returns `ApiError::Config` for invalid headers or TLS setup failures.
    pub fn build_blocking(&self) -> ApiResult<BlockingHttpClient> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.header_map()?);
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(BlockingHttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_default_headers_and_user_agent_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("accept", "application/json"))
            .and(header("user-agent", "basalam-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .user_agent("basalam-test/1.0")
            .default_header("Accept", "application/json")
            .build()
            .unwrap();
        let url = Url::parse(&format!("{}/ping", server.uri())).unwrap();
        let response = client.send(client.request(Method::GET, url)).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.body, b"pong");
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        let client = HttpClient::builder().timeout(Duration::from_secs(2)).build().unwrap();
        let url = Url::parse("http://127.0.0.1:1/unreachable").unwrap();

        let err = client.send(client.request(Method::GET, url)).await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let err = HttpClient::builder().default_header("bad header", "x").build().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_raw_response_success_range() {
        let ok = RawResponse { status: 204, reason: None, body: Vec::new() };
        let moved = RawResponse { status: 301, reason: None, body: Vec::new() };
        assert!(ok.is_success());
        assert!(!moved.is_success());
    }
}
