//! Notification Module
//!
//! Relays push messages to the user as notifications and opens the linked
//! page when a notification is clicked. Delivery is fire-and-forget.

mod relay;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::Result;

pub use relay::NotificationRelay;

/// Icon shown on every notification
pub const NOTIFICATION_ICON: &str = "/images/icon-192x192.png";
/// Badge shown on every notification
pub const NOTIFICATION_BADGE: &str = "/images/badge.png";

// == Push Payload ==
/// Body of a push message.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PushPayload {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub url: Option<String>,
}

// == Notification ==
/// A displayed notification.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn from_payload(id: u64, payload: PushPayload) -> Self {
        Self {
            id,
            title: payload.title,
            body: payload.body,
            icon: NOTIFICATION_ICON.to_string(),
            badge: NOTIFICATION_BADGE.to_string(),
            url: payload.url.filter(|u| !u.is_empty()),
            created_at: Utc::now(),
        }
    }
}

// == Traits ==
/// Displays and closes notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn show(&self, notification: &Notification) -> Result<()>;
    async fn close(&self, id: u64) -> Result<()>;
}

/// Opens a URL in a new or existing client window.
#[async_trait]
pub trait ClientOpener: Send + Sync {
    async fn open_window(&self, url: &str) -> Result<()>;
}

// == Log Notifier ==
/// Notifier that logs and remembers what it displayed.
#[derive(Debug, Default)]
pub struct LogNotifier {
    shown: Mutex<Vec<Notification>>,
    closed: Mutex<Vec<u64>>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn shown(&self) -> Vec<Notification> {
        self.shown.lock().await.clone()
    }

    pub async fn closed(&self) -> Vec<u64> {
        self.closed.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn show(&self, notification: &Notification) -> Result<()> {
        info!(
            "Notification #{}: {} - {}",
            notification.id, notification.title, notification.body
        );
        self.shown.lock().await.push(notification.clone());
        Ok(())
    }

    async fn close(&self, id: u64) -> Result<()> {
        info!("Notification #{} closed", id);
        self.closed.lock().await.push(id);
        Ok(())
    }
}

// == Log Opener ==
/// Client opener that logs and remembers the URLs it was asked to open.
#[derive(Debug, Default)]
pub struct LogOpener {
    opened: Mutex<Vec<String>>,
}

impl LogOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn opened(&self) -> Vec<String> {
        self.opened.lock().await.clone()
    }
}

#[async_trait]
impl ClientOpener for LogOpener {
    async fn open_window(&self, url: &str) -> Result<()> {
        info!("Opening client window at {}", url);
        self.opened.lock().await.push(url.to_string());
        Ok(())
    }
}
