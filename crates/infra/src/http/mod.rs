//! HTTP transport shared by the async and blocking dispatchers

pub mod client;

pub use client::{BlockingHttpClient, HttpClient, HttpClientBuilder, RawResponse};
