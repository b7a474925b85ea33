//! Cache Entry Module
//!
//! Defines request identity and the immutable stored response.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Bytes;

// == Request Key ==
/// Identity of a request: method plus absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey {
    method: String,
    url: String,
}

impl RequestKey {
    /// Creates a key, normalizing the method to upper case.
    pub fn new(method: impl AsRef<str>, url: impl Into<String>) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            url: url.into(),
        }
    }

    /// Shorthand for a GET key.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

// == Stored Response ==
/// A response snapshot: status, headers and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl StoredResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Returns the first header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// == Cache Entry ==
/// A stored response plus the time it was written.
///
/// Entries are never patched; an update replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    response: StoredResponse,
    /// Write timestamp (Unix milliseconds)
    stored_at: u64,
}

impl CacheEntry {
    pub fn new(response: StoredResponse) -> Self {
        Self {
            response,
            stored_at: current_timestamp_ms(),
        }
    }

    pub fn response(&self) -> &StoredResponse {
        &self.response
    }

    pub fn stored_at(&self) -> u64 {
        self.stored_at
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
