//! Cache Store Module
//!
//! Holds every named cache generation and the counters describing how they are used.

use std::collections::HashMap;

use crate::cache::{CacheStats, Generation, RequestKey, StoredResponse};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// All cache generations, keyed by generation name.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Generation name -> generation
    generations: HashMap<String, Generation>,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Open ==
    /// Returns the named generation, creating it empty if missing.
    pub fn open(&mut self, name: &str) -> &mut Generation {
        self.generations.entry(name.to_string()).or_default()
    }

    /// Returns the named generation without creating it.
    pub fn generation(&self, name: &str) -> Option<&Generation> {
        self.generations.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.generations.contains_key(name)
    }

    // == Replace ==
    /// Installs a fully populated generation under `name`, dropping any previous contents.
    pub fn replace(&mut self, name: &str, generation: Generation) {
        self.stats.writes += generation.len() as u64;
        self.generations.insert(name.to_string(), generation);
        self.refresh_entry_count();
    }

    // == Delete ==
    /// Deletes a generation. Returns true if it existed.
    pub fn delete(&mut self, name: &str) -> bool {
        let removed = self.generations.remove(name).is_some();
        self.refresh_entry_count();
        removed
    }

    // == Keys ==
    /// Returns all generation names, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut names: Vec<String> = self.generations.keys().cloned().collect();
        names.sort();
        names
    }

    // == Lookup ==
    /// Looks up a request in the named generation, recording a hit or miss.
    ///
    /// A missing generation counts as a miss.
    pub fn lookup(&mut self, name: &str, key: &RequestKey) -> Option<StoredResponse> {
        let found = self
            .generations
            .get(name)
            .and_then(|generation| generation.match_request(key))
            .cloned();

        match found {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        found
    }

    // == Put ==
    /// Writes a response into an existing generation.
    ///
    /// Fails with NotFound if the generation has been deleted, so a late write
    /// never brings a stale generation back.
    pub fn put(&mut self, name: &str, key: RequestKey, response: StoredResponse) -> Result<()> {
        let generation = self
            .generations
            .get_mut(name)
            .ok_or_else(|| CacheError::NotFound(format!("cache generation '{}'", name)))?;

        generation.put(key, response);
        self.stats.record_write();
        self.refresh_entry_count();
        Ok(())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Mutable access for counters owned by the interceptor and lifecycle.
    pub fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    /// Total entries across all generations.
    pub fn len(&self) -> usize {
        self.generations.values().map(Generation::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn refresh_entry_count(&mut self) {
        let total = self.len();
        self.stats.set_total_entries(total);
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
    fn test_store_new() {
        let store = CacheStore::new();
        assert!(store.is_empty());
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_open_creates_generation() {
        let mut store = CacheStore::new();
        store.open("plati-market-cache-v1");

        assert!(store.has("plati-market-cache-v1"));
        assert_eq!(store.keys(), vec!["plati-market-cache-v1".to_string()]);
    }

    #[test]
    fn test_put_then_lookup_round_trip() {
        let mut store = CacheStore::new();
        store.open("v1");
        let key = RequestKey::get("http://shop.test/index.html");

        store.put("v1", key.clone(), ok("<html>")).unwrap();
        let found = store.lookup("v1", &key).unwrap();

        assert_eq!(found.status, 200);
        assert_eq!(found.body.as_ref(), b"<html>");
        assert_eq!(store.stats().hits, 1);
        assert_eq!(store.stats().writes, 1);
    }

    #[test]
    fn test_lookup_miss_in_other_generation() {
        let mut store = CacheStore::new();
        store.open("v1");
        store.open("v2");
        let key = RequestKey::get("http://shop.test/");
        store.put("v1", key.clone(), ok("old")).unwrap();

        assert!(store.lookup("v2", &key).is_none());
        assert!(store.lookup("missing", &key).is_none());
        assert_eq!(store.stats().misses, 2);
    }

    #[test]
    fn test_put_into_deleted_generation_fails() {
        let mut store = CacheStore::new();
        store.open("v1");
        store.delete("v1");

        let result = store.put("v1", RequestKey::get("http://shop.test/"), ok("x"));
        assert!(matches!(result, Err(CacheError::NotFound(_))));
        assert!(!store.has("v1"));
    }

    #[test]
    fn test_replace_drops_previous_contents() {
        let mut store = CacheStore::new();
        store.open("v1");
        store
            .put("v1", RequestKey::get("http://shop.test/extra"), ok("x"))
            .unwrap();

        let mut fresh = Generation::new();
        fresh.put(RequestKey::get("http://shop.test/"), ok("root"));
        store.replace("v1", fresh);

        let generation = store.generation("v1").unwrap();
        assert_eq!(generation.len(), 1);
        assert!(generation
            .match_request(&RequestKey::get("http://shop.test/extra"))
            .is_none());
        assert_eq!(store.stats().total_entries, 1);
    }

    #[test]
    fn test_delete_updates_entry_count() {
        let mut store = CacheStore::new();
        store.open("v1");
        store
            .put("v1", RequestKey::get("http://shop.test/a"), ok("a"))
            .unwrap();
        assert_eq!(store.stats().total_entries, 1);

        assert!(store.delete("v1"));
        assert!(!store.delete("v1"));
        assert_eq!(store.stats().total_entries, 0);
    }
}
