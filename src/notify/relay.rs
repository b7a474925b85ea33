//! Notification Relay
//!
//! Turns push payloads into notifications and handles their clicks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use super::{ClientOpener, Notification, Notifier, PushPayload};
use crate::error::{CacheError, Result};

// == Notification Relay ==
pub struct NotificationRelay {
    notifier: Arc<dyn Notifier>,
    opener: Arc<dyn ClientOpener>,
    active: Mutex<HashMap<u64, Notification>>,
    next_id: AtomicU64,
}

impl NotificationRelay {
    pub fn new(notifier: Arc<dyn Notifier>, opener: Arc<dyn ClientOpener>) -> Self {
        Self {
            notifier,
            opener,
            active: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    // == Push ==
    /// Parses a raw push message and displays it.
    pub async fn push(&self, raw: &[u8]) -> Result<Notification> {
        let payload: PushPayload = serde_json::from_slice(raw)
            .map_err(|e| CacheError::InvalidRequest(format!("Malformed push payload: {}", e)))?;
        self.show(payload).await
    }

    /// Displays an already parsed payload.
    pub async fn show(&self, payload: PushPayload) -> Result<Notification> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let notification = Notification::from_payload(id, payload);

        self.notifier.show(&notification).await?;
        self.active.lock().await.insert(id, notification.clone());
        Ok(notification)
    }

    // == Click ==
    /// Closes the notification and opens its URL, if it has one.
    ///
    /// Returns the URL that was opened. A failure to open is logged, not
    /// reported: there is no retry and no acknowledgement.
    pub async fn click(&self, id: u64) -> Result<Option<String>> {
        let notification = self
            .active
            .lock()
            .await
            .remove(&id)
            .ok_or_else(|| CacheError::NotFound(format!("notification {}", id)))?;

        if let Err(e) = self.notifier.close(id).await {
            warn!("Failed to close notification #{}: {}", id, e);
        }

        if let Some(url) = &notification.url {
            if let Err(e) = self.opener.open_window(url).await {
                warn!("Failed to open {} for notification #{}: {}", url, id, e);
            }
        }
        Ok(notification.url)
    }

    /// Notifications shown and not yet clicked, oldest first.
    pub async fn active(&self) -> Vec<Notification> {
        let mut active: Vec<Notification> = self.active.lock().await.values().cloned().collect();
        active.sort_by_key(|n| n.id);
        active
    }
}
