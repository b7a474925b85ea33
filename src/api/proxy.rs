//! Proxy Handler
//!
//! Fallback route: every request that is not a control endpoint goes through
//! the interceptor.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
};

use super::handlers::AppState;
use crate::cache::StoredResponse;
use crate::error::{CacheError, Result};
use crate::network::NetworkRequest;
use crate::worker::{Interception, Source};

/// Response header naming where the body came from: cache, network or offline.
pub const SOURCE_HEADER: &str = "x-worker-source";

/// Handler for every non-control route.
///
/// The write-back task, if any, is detached: the response is sent while the
/// cache is updated in the background.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let url = state.worker.resolve(path)?;

    let request = NetworkRequest::new(method.as_str(), url)
        .with_headers(header_pairs(&headers))
        .with_body(body);

    let Interception {
        response, source, ..
    } = state.worker.intercept(request).await?;

    into_response(response, source)
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

fn into_response(stored: StoredResponse, source: Source) -> Result<Response> {
    let mut builder = Response::builder().status(stored.status);
    for (name, value) in &stored.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .header(SOURCE_HEADER, source.as_str())
        .body(Body::from(stored.body))
        .map_err(|e| CacheError::Internal(e.to_string()))
}
