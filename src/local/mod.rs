//! Local Storage Module
//!
//! String key-value storage for the storefront's session data, with typed
//! reads that keep "missing" and "unreadable" apart.

mod session;

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

pub use session::{AuthData, FavoriteProduct, SessionStore, UserProfile, AUTH_KEY, FAVORITES_KEY};

// == Stored ==
/// Result of reading a JSON value from local storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Stored<T> {
    /// Nothing stored under the key
    Absent,
    /// Something is stored but does not parse as `T`
    Corrupted { raw: String, reason: String },
    /// Parsed value
    Present(T),
}

impl<T> Stored<T> {
    pub fn present(self) -> Option<T> {
        match self {
            Stored::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_corrupted(&self) -> bool {
        matches!(self, Stored::Corrupted { .. })
    }
}

impl<T: DeserializeOwned> Stored<T> {
    /// Decodes an optional raw string.
    pub fn decode(raw: Option<String>) -> Self {
        match raw {
            None => Stored::Absent,
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Stored::Present(value),
                Err(e) => Stored::Corrupted {
                    raw,
                    reason: e.to_string(),
                },
            },
        }
    }
}

// == Key Value Store ==
/// In-memory string map shared by the session services.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    items: RwLock<HashMap<String, String>>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.items.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: impl Into<String>) {
        self.items.write().await.insert(key.to_string(), value.into());
    }

    /// Removes a key. Returns true if it existed.
    pub async fn remove(&self, key: &str) -> bool {
        self.items.write().await.remove(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_absent() {
        let stored: Stored<Vec<String>> = Stored::decode(None);
        assert_eq!(stored, Stored::Absent);
    }

    #[test]
    fn test_decode_present() {
        let stored: Stored<Vec<String>> = Stored::decode(Some(r#"["a","b"]"#.to_string()));
        assert_eq!(stored.present(), Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_decode_corrupted_keeps_raw() {
        let stored: Stored<Vec<String>> = Stored::decode(Some("{not json".to_string()));

        assert!(stored.is_corrupted());
        match stored {
            Stored::Corrupted { raw, reason } => {
                assert_eq!(raw, "{not json");
                assert!(!reason.is_empty());
            }
            other => panic!("expected corrupted, got {:?}", other),
        }
    }

    #[test]
    fn test_stored_serializes_with_state_tag() {
        let present = serde_json::to_value(Stored::Present(1u32)).unwrap();
        assert_eq!(present["state"], "present");
        assert_eq!(present["value"], 1);

        let absent = serde_json::to_value(Stored::<u32>::Absent).unwrap();
        assert_eq!(absent["state"], "absent");
    }

    #[tokio::test]
    async fn test_key_value_store() {
        let store = KeyValueStore::new();
        assert_eq!(store.get("k").await, None);

        store.set("k", "v").await;
        assert_eq!(store.get("k").await.as_deref(), Some("v"));

        assert!(store.remove("k").await);
        assert!(!store.remove("k").await);
    }
}
