//! Cache Generation Module
//!
//! A single named snapshot of cached responses.

use std::collections::HashMap;

use crate::cache::{CacheEntry, RequestKey, StoredResponse};

// == Generation ==
/// One versioned cache: request identity -> stored response.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    entries: HashMap<RequestKey, CacheEntry>,
}

impl Generation {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Put ==
    /// Stores a response, replacing any previous entry for the key wholesale.
    ///
    /// Returns true if an existing entry was replaced.
    pub fn put(&mut self, key: RequestKey, response: StoredResponse) -> bool {
        self.entries
            .insert(key, CacheEntry::new(response))
            .is_some()
    }

    // == Match ==
    /// Returns the stored response for an exact key match.
    pub fn match_request(&self, key: &RequestKey) -> Option<&StoredResponse> {
        self.entries.get(key).map(CacheEntry::response)
    }

    /// Write time (Unix ms) of the most recently stored entry.
    pub fn last_stored_at(&self) -> Option<u64> {
        self.entries.values().map(CacheEntry::stored_at).max()
    }

    /// Returns all keys, sorted for stable output.
    pub fn keys(&self) -> Vec<RequestKey> {
        let mut keys: Vec<RequestKey> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &'static str) -> StoredResponse {
        StoredResponse::new(200, Vec::new(), body)
    }

    #[test]
    fn test_put_and_match() {
        let mut generation = Generation::new();
        let key = RequestKey::get("http://shop.test/css/style.css");

        assert!(!generation.put(key.clone(), ok("a")));
        assert_eq!(generation.match_request(&key), Some(&ok("a")));
        assert_eq!(generation.len(), 1);
    }

    #[test]
    fn test_put_overwrites_wholesale() {
        let mut generation = Generation::new();
        let key = RequestKey::get("http://shop.test/js/app.js");

        generation.put(
            key.clone(),
            StoredResponse::new(200, vec![("etag".into(), "1".into())], "old"),
        );
        let replaced = generation.put(key.clone(), ok("new"));

        assert!(replaced);
        let stored = generation.match_request(&key).unwrap();
        assert_eq!(stored.body.as_ref(), b"new");
        assert!(stored.headers.is_empty());
    }

    #[test]
    fn test_match_requires_same_method() {
        let mut generation = Generation::new();
        generation.put(RequestKey::get("http://shop.test/api/x"), ok("a"));

        let post = RequestKey::new("POST", "http://shop.test/api/x");
        assert!(generation.match_request(&post).is_none());
    }

    #[test]
    fn test_last_stored_at() {
        let mut generation = Generation::new();
        assert!(generation.is_empty());
        assert_eq!(generation.last_stored_at(), None);

        let before = crate::cache::current_timestamp_ms();
        generation.put(RequestKey::get("http://shop.test/"), ok("a"));

        let stored_at = generation.last_stored_at().unwrap();
        assert!(stored_at >= before);
        assert!(stored_at <= crate::cache::current_timestamp_ms());
    }

    #[test]
    fn test_keys_sorted() {
        let mut generation = Generation::new();
        generation.put(RequestKey::get("http://shop.test/b"), ok("b"));
        generation.put(RequestKey::get("http://shop.test/a"), ok("a"));

        let urls: Vec<String> = generation
            .keys()
            .iter()
            .map(|k| k.url().to_string())
            .collect();
        assert_eq!(urls, vec!["http://shop.test/a", "http://shop.test/b"]);
    }
}
