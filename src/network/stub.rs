//! Stub Fetcher
//!
//! Scripted in-memory network with an optional artificial delay. Stands in for
//! the origin in tests and demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{FetchError, Fetcher, NetworkRequest, NetworkResponse, ResponseKind};
use crate::cache::{RequestKey, StoredResponse};

#[derive(Debug, Clone)]
enum Reply {
    Respond(NetworkResponse),
    Fail(String),
}

// == Stub Fetcher ==
/// Fetcher answering from a URL -> reply table and recording every call.
///
/// Unknown URLs fail as unreachable. `set_offline(true)` fails every call.
#[derive(Debug, Default)]
pub struct StubFetcher {
    routes: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<RequestKey>>,
    offline: AtomicBool,
    delay: Duration,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `delay` before every reply, simulating network latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Scripts a full response for `url`.
    pub fn respond(&self, url: &str, response: NetworkResponse) -> &Self {
        self.insert(url, Reply::Respond(response));
        self
    }

    /// Scripts a same-origin 200 response with the given body.
    pub fn respond_ok(&self, url: &str, content_type: &str, body: &str) -> &Self {
        let response = StoredResponse::new(
            200,
            vec![("content-type".to_string(), content_type.to_string())],
            body.to_string(),
        );
        self.respond(url, NetworkResponse::basic(response))
    }

    /// Scripts a same-origin response with an arbitrary status.
    pub fn respond_status(&self, url: &str, status: u16, body: &str) -> &Self {
        let response = StoredResponse::new(status, Vec::new(), body.to_string());
        self.respond(url, NetworkResponse::basic(response))
    }

    /// Scripts a cross-origin 200 response.
    pub fn respond_cors(&self, url: &str, body: &str) -> &Self {
        let response = NetworkResponse {
            kind: ResponseKind::Cors,
            response: StoredResponse::new(200, Vec::new(), body.to_string()),
        };
        self.respond(url, response)
    }

    /// Scripts a network failure for `url`.
    pub fn fail(&self, url: &str) -> &Self {
        self.insert(url, Reply::Fail(format!("connection refused: {}", url)));
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Requests seen so far, in order.
    pub fn calls(&self) -> Vec<RequestKey> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn insert(&self, url: &str, reply: Reply) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert(url.to_string(), reply);
        }
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, request: &NetworkRequest) -> Result<NetworkResponse, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.key());
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Unreachable("offline".to_string()));
        }

        let reply = self
            .routes
            .lock()
            .ok()
            .and_then(|routes| routes.get(request.url.as_str()).cloned());

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(reason)) => Err(FetchError::Unreachable(reason)),
            None => Err(FetchError::Unreachable(format!(
                "no route for {}",
                request.url
            ))),
        }
    }
}
