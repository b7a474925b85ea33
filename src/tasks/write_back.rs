//! Cache Write-Back Task
//!
//! Stores a network response into a cache generation after the response has
//! already been handed to the caller.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::{CacheStore, RequestKey, StoredResponse};

/// Spawns a task writing `response` under `key` into `generation`.
///
/// The caller never waits on this write. If the generation has been deleted
/// by the time the task runs (an activation raced it), the write is dropped.
///
/// # Arguments
/// * `cache` - Arc<RwLock<CacheStore>> shared reference to the cache
/// * `generation` - Name of the generation the request was resolved against
/// * `key` - Request identity
/// * `response` - Copy of the response that was served
///
/// # Returns
/// A JoinHandle the caller may await to extend the request's lifetime until
/// the write has landed.
pub fn spawn_cache_write(
    cache: Arc<RwLock<CacheStore>>,
    generation: String,
    key: RequestKey,
    response: StoredResponse,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut cache_guard = cache.write().await;
        match cache_guard.put(&generation, key.clone(), response) {
            Ok(()) => debug!("Cached {} in {}", key, generation),
            Err(e) => debug!("Dropped write-back of {}: {}", key, e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &'static str) -> StoredResponse {
        StoredResponse::new(200, Vec::new(), body)
    }

    #[tokio::test]
    async fn test_write_lands_in_generation() {
        let mut store = CacheStore::new();
        store.open("v1");
        let cache = Arc::new(RwLock::new(store));
        let key = RequestKey::get("http://shop.test/js/chat.js");

        spawn_cache_write(cache.clone(), "v1".to_string(), key.clone(), ok("chat"))
            .await
            .unwrap();

        let mut cache_guard = cache.write().await;
        let stored = cache_guard.lookup("v1", &key).unwrap();
        assert_eq!(stored.body.as_ref(), b"chat");
    }

    #[tokio::test]
    async fn test_write_to_deleted_generation_is_dropped() {
        let cache = Arc::new(RwLock::new(CacheStore::new()));
        let key = RequestKey::get("http://shop.test/js/chat.js");

        spawn_cache_write(cache.clone(), "gone".to_string(), key, ok("chat"))
            .await
            .unwrap();

        let cache_guard = cache.read().await;
        assert!(!cache_guard.has("gone"));
        assert_eq!(cache_guard.stats().writes, 0);
    }

    #[tokio::test]
    async fn test_aborted_write_stores_nothing() {
        let mut store = CacheStore::new();
        store.open("v1");
        let cache = Arc::new(RwLock::new(store));
        let key = RequestKey::get("http://shop.test/");

        // Hold the lock so the task cannot write before the abort.
        let guard = cache.write().await;
        let handle = spawn_cache_write(cache.clone(), "v1".to_string(), key.clone(), ok("x"));
        handle.abort();
        drop(guard);

        let result = handle.await;
        assert!(result.unwrap_err().is_cancelled());

        let mut cache_guard = cache.write().await;
        assert!(cache_guard.lookup("v1", &key).is_none());
        assert_eq!(cache_guard.stats().writes, 0);
    }
}
