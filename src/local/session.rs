//! Session Store
//!
//! Typed access to the auth blob and the favorites list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{KeyValueStore, Stored};
use crate::cache::current_timestamp_ms;
use crate::error::{CacheError, Result};

/// Key of the JSON-encoded auth blob
pub const AUTH_KEY: &str = "plati_auth";
/// Key of the JSON-encoded favorites list
pub const FAVORITES_KEY: &str = "plati_favorites";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    pub token: String,
    pub user: UserProfile,
}

/// A favorited product; only `id` is interpreted, other fields are kept for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteProduct {
    pub id: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl FavoriteProduct {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            details: Map::new(),
        }
    }
}

// == Session Store ==
#[derive(Debug, Default)]
pub struct SessionStore {
    storage: KeyValueStore,
    /// Held across each favorites read-modify-write
    favorites_update: Mutex<()>,
}

impl SessionStore {
    pub fn new(storage: KeyValueStore) -> Self {
        Self {
            storage,
            favorites_update: Mutex::new(()),
        }
    }

    /// Underlying raw storage.
    pub fn storage(&self) -> &KeyValueStore {
        &self.storage
    }

    // == Auth ==
    pub async fn auth(&self) -> Stored<AuthData> {
        Stored::decode(self.storage.get(AUTH_KEY).await)
    }

    /// Simulated sign-in: any non-empty credentials produce a demo session.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthData> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(CacheError::InvalidRequest(
                "Username and password are required".to_string(),
            ));
        }

        let username = username.trim();
        let auth = AuthData {
            token: format!("demo_token_{}", current_timestamp_ms()),
            user: UserProfile {
                username: username.to_string(),
                display_name: Some(format!("User {}", username)),
                email: Some(format!("{}@example.com", username)),
                avatar: None,
            },
        };
        self.save_auth(&auth).await?;
        info!("Signed in {}", username);
        Ok(auth)
    }

    pub async fn save_auth(&self, auth: &AuthData) -> Result<()> {
        if auth.token.is_empty() {
            return Err(CacheError::InvalidRequest("Token is required".to_string()));
        }
        let raw = serde_json::to_string(auth).map_err(|e| CacheError::Internal(e.to_string()))?;
        self.storage.set(AUTH_KEY, raw).await;
        Ok(())
    }

    /// Signs out. Returns true if a session was stored.
    pub async fn clear_auth(&self) -> bool {
        self.storage.remove(AUTH_KEY).await
    }

    async fn require_auth(&self) -> Result<()> {
        match self.auth().await {
            Stored::Present(_) => Ok(()),
            Stored::Absent => Err(CacheError::Unauthorized(
                "Authorization required".to_string(),
            )),
            Stored::Corrupted { reason, .. } => Err(CacheError::Unauthorized(format!(
                "Stored session is unreadable: {}",
                reason
            ))),
        }
    }

    // == Favorites ==
    pub async fn favorites(&self) -> Stored<Vec<FavoriteProduct>> {
        Stored::decode(self.storage.get(FAVORITES_KEY).await)
    }

    /// Adds a product. Returns false if it was already a favorite.
    pub async fn add_favorite(&self, product: FavoriteProduct) -> Result<bool> {
        validate_product_id(&product.id)?;
        self.require_auth().await?;

        let _guard = self.favorites_update.lock().await;
        let mut favorites = self.favorites_for_update().await;
        if favorites.iter().any(|f| f.id == product.id) {
            return Ok(false);
        }
        favorites.push(product);
        self.write_favorites(&favorites).await?;
        Ok(true)
    }

    /// Removes a product. Returns false if it was not a favorite.
    pub async fn remove_favorite(&self, id: &str) -> Result<bool> {
        validate_product_id(id)?;
        self.require_auth().await?;

        let _guard = self.favorites_update.lock().await;
        let mut favorites = self.favorites_for_update().await;
        let before = favorites.len();
        favorites.retain(|f| f.id != id);
        let removed = favorites.len() != before;
        self.write_favorites(&favorites).await?;
        Ok(removed)
    }

    /// Current list for a read-modify-write; an unreadable list is replaced.
    async fn favorites_for_update(&self) -> Vec<FavoriteProduct> {
        match self.favorites().await {
            Stored::Present(favorites) => favorites,
            Stored::Absent => Vec::new(),
            Stored::Corrupted { reason, .. } => {
                warn!("Discarding unreadable favorites list: {}", reason);
                Vec::new()
            }
        }
    }

    async fn write_favorites(&self, favorites: &[FavoriteProduct]) -> Result<()> {
        let raw =
            serde_json::to_string(favorites).map_err(|e| CacheError::Internal(e.to_string()))?;
        self.storage.set(FAVORITES_KEY, raw).await;
        Ok(())
    }
}

fn validate_product_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(CacheError::InvalidRequest(
            "Product ID is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn signed_in() -> SessionStore {
        let session = SessionStore::default();
        session.login("buyer", "secret").await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_login_stores_auth_blob() {
        let session = SessionStore::default();
        assert_eq!(session.auth().await, Stored::Absent);

        let auth = session.login("buyer", "secret").await.unwrap();

        assert!(auth.token.starts_with("demo_token_"));
        assert_eq!(session.auth().await, Stored::Present(auth));
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let session = SessionStore::default();
        assert!(matches!(
            session.login("", "secret").await,
            Err(CacheError::InvalidRequest(_))
        ));
        assert!(matches!(
            session.login("buyer", "").await,
            Err(CacheError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupted_auth_is_not_absent() {
        let session = SessionStore::default();
        session.storage().set(AUTH_KEY, "{\"token\":").await;

        assert!(session.auth().await.is_corrupted());
    }

    #[tokio::test]
    async fn test_auth_blob_uses_camel_case() {
        let session = signed_in().await;
        let raw = session.storage().get(AUTH_KEY).await.unwrap();
        assert!(raw.contains("displayName"));
    }

    #[tokio::test]
    async fn test_clear_auth() {
        let session = signed_in().await;
        assert!(session.clear_auth().await);
        assert_eq!(session.auth().await, Stored::Absent);
    }

    #[tokio::test]
    async fn test_add_and_remove_favorite() {
        let session = signed_in().await;

        assert!(session.add_favorite(FavoriteProduct::new("42")).await.unwrap());
        assert!(!session.add_favorite(FavoriteProduct::new("42")).await.unwrap());
        assert_eq!(session.favorites().await.present().unwrap().len(), 1);

        assert!(session.remove_favorite("42").await.unwrap());
        assert!(!session.remove_favorite("42").await.unwrap());
        assert_eq!(session.favorites().await, Stored::Present(Vec::new()));
    }

    #[tokio::test]
    async fn test_favorite_keeps_display_fields() {
        let session = signed_in().await;
        let product: FavoriteProduct =
            serde_json::from_str(r#"{"id":"7","title":"Game key","price":199}"#).unwrap();

        session.add_favorite(product.clone()).await.unwrap();

        let stored = session.favorites().await.present().unwrap();
        assert_eq!(stored, vec![product]);
        assert_eq!(stored[0].details["price"], 199);
    }

    #[tokio::test]
    async fn test_empty_product_id_rejected() {
        let session = signed_in().await;
        assert!(matches!(
            session.add_favorite(FavoriteProduct::new(" ")).await,
            Err(CacheError::InvalidRequest(msg)) if msg == "Product ID is required"
        ));
        assert!(matches!(
            session.remove_favorite("").await,
            Err(CacheError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_favorites_require_auth() {
        let session = SessionStore::default();
        assert!(matches!(
            session.add_favorite(FavoriteProduct::new("1")).await,
            Err(CacheError::Unauthorized(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_all_kept() {
        let session = std::sync::Arc::new(signed_in().await);

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..50 {
            let session = session.clone();
            tasks.spawn(async move {
                session
                    .add_favorite(FavoriteProduct::new(i.to_string()))
                    .await
                    .unwrap()
            });
        }

        let mut added = 0;
        while let Some(result) = tasks.join_next().await {
            if result.unwrap() {
                added += 1;
            }
        }

        let stored = session.favorites().await.present().unwrap();
        assert_eq!(added, 50);
        assert_eq!(stored.len(), added);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_add_and_remove_do_not_clobber() {
        let session = std::sync::Arc::new(signed_in().await);
        for i in 0..20 {
            session
                .add_favorite(FavoriteProduct::new(format!("old-{}", i)))
                .await
                .unwrap();
        }

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..20 {
            let remover = session.clone();
            tasks.spawn(async move {
                remover
                    .remove_favorite(&format!("old-{}", i))
                    .await
                    .unwrap()
            });
            let adder = session.clone();
            tasks.spawn(async move {
                adder
                    .add_favorite(FavoriteProduct::new(format!("new-{}", i)))
                    .await
                    .unwrap()
            });
        }
        while let Some(result) = tasks.join_next().await {
            assert!(result.unwrap());
        }

        let stored = session.favorites().await.present().unwrap();
        assert_eq!(stored.len(), 20);
        assert!(stored.iter().all(|f| f.id.starts_with("new-")));
    }

    #[tokio::test]
    async fn test_corrupted_favorites_surface_then_reset_on_write() {
        let session = signed_in().await;
        session.storage().set(FAVORITES_KEY, "not json").await;

        assert!(session.favorites().await.is_corrupted());

        session.add_favorite(FavoriteProduct::new("1")).await.unwrap();
        assert_eq!(
            session.favorites().await,
            Stored::Present(vec![FavoriteProduct::new("1")])
        );
    }
}
