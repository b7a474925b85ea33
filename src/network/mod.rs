//! Network Module
//!
//! The seam between the proxy and the origin. The interceptor and lifecycle
//! only ever see the [`Fetcher`] trait, so the real HTTP client and the
//! scripted stub are interchangeable.

mod http;
mod stub;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;
use url::Url;

use crate::cache::{RequestKey, StoredResponse};

pub use http::ReqwestFetcher;
pub use stub::StubFetcher;

// == Network Request ==
/// An outgoing request as seen by the interceptor.
#[derive(Debug, Clone)]
pub struct NetworkRequest {
    pub method: String,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl NetworkRequest {
    pub fn new(method: impl AsRef<str>, url: Url) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            url,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Shorthand for a bodiless GET.
    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Cache identity of this request.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(&self.method, self.url.as_str())
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

// == Response Kind ==
/// Where a response came from, relative to the proxied origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response with readable status and body
    Basic,
    /// Cross-origin response (the origin redirected elsewhere)
    Cors,
}

// == Network Response ==
#[derive(Debug, Clone)]
pub struct NetworkResponse {
    pub kind: ResponseKind,
    pub response: StoredResponse,
}

impl NetworkResponse {
    pub fn basic(response: StoredResponse) -> Self {
        Self {
            kind: ResponseKind::Basic,
            response,
        }
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }

    /// Only plain 200 same-origin responses are written back into the cache.
    pub fn is_cacheable(&self) -> bool {
        self.response.status == 200 && self.kind == ResponseKind::Basic
    }
}

// == Fetch Error ==
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// Connection could not be established or was dropped
    #[error("network unreachable: {0}")]
    Unreachable(String),

    /// The origin did not answer in time
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request could not be built
    #[error("invalid request: {0}")]
    Invalid(String),
}

// == Fetcher ==
/// Performs network requests on behalf of the interceptor and the installer.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &NetworkRequest) -> Result<NetworkResponse, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_request_key_uses_method_and_url() {
        let request = NetworkRequest::new("post", url("http://shop.test/api/cart"));
        let key = request.key();

        assert_eq!(key.method(), "POST");
        assert_eq!(key.url(), "http://shop.test/api/cart");
        assert!(!request.is_get());
    }

    #[test]
    fn test_cacheable_requires_200_basic() {
        let ok = NetworkResponse::basic(StoredResponse::new(200, Vec::new(), "x"));
        assert!(ok.is_cacheable());

        let not_found = NetworkResponse::basic(StoredResponse::new(404, Vec::new(), "x"));
        assert!(!not_found.is_cacheable());

        let cors = NetworkResponse {
            kind: ResponseKind::Cors,
            response: StoredResponse::new(200, Vec::new(), "x"),
        };
        assert!(!cors.is_cacheable());
    }
}
