//! Resource request description
//!
//! An [`ApiRequest`] is plain data: the dispatcher can send it any number of
//! times, which is what makes the retry after a token refresh identical to
//! the first attempt.

use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;

use super::errors::{ApiError, ApiResult};

/// One call against a service, relative to the service's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), headers: Vec::new(), body: None }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Add a header; caller headers override client defaults but never the
    /// `Authorization` header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns `ApiError::Validation` if `body` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Validation(format!("failed to serialize request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn json_value(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Absolute URL for this request against `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        }
    }

    /// Parsed form of [`ApiRequest::url`].
    ///
    /// # Errors
    /// Returns `ApiError::Config` when the joined URL does not parse.
    pub fn resolve(&self, base_url: &str) -> ApiResult<Url> {
        let raw = self.url(base_url);
        Url::parse(&raw).map_err(|e| ApiError::Config(format!("invalid request URL {raw}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let request = ApiRequest::get("/v3/users/me");
        assert_eq!(
            request.url("https://core.basalam.com/"),
            "https://core.basalam.com/v3/users/me"
        );
        assert_eq!(
            ApiRequest::get("v1/events").url("http://localhost:1"),
            "http://localhost:1/v1/events"
        );
    }

    #[test]
    fn test_builder_collects_parts() {
        let request = ApiRequest::post("/v2/message")
            .query("page", 2)
            .header("x-operator-id", "77")
            .json(&json!({ "chat_id": 1 }))
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.query_params(), [("page".to_string(), "2".to_string())]);
        assert_eq!(request.headers()[0].1, "77");
        assert_eq!(request.body(), Some(&json!({ "chat_id": 1 })));
    }

    #[test]
    fn test_clone_is_identical() {
        let request = ApiRequest::delete("/v2/user/1/spend/2")
            .json_value(json!({ "rollback_reason_id": 3 }));
        assert_eq!(request.clone(), request);
    }
}
