//! Response DTOs for the worker control API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::worker::GenerationInfo;

/// Body synthesized for API requests that fail at the network layer
#[derive(Debug, Clone, Serialize)]
pub struct OfflineResponse {
    pub error: String,
    pub offline: bool,
}

impl OfflineResponse {
    pub fn no_connection() -> Self {
        Self {
            error: "No internet connection".to_string(),
            offline: true,
        }
    }
}

/// Response body for GET /_worker/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for GET /_worker/caches
#[derive(Debug, Clone, Serialize)]
pub struct GenerationsResponse {
    pub current: String,
    pub generations: Vec<GenerationInfo>,
}

/// Response body for POST /_worker/activate
#[derive(Debug, Clone, Serialize)]
pub struct ActivateResponse {
    pub current: String,
    pub deleted: Vec<String>,
}

/// Response body for POST /_worker/notifications/:id/click
#[derive(Debug, Clone, Serialize)]
pub struct ClickResponse {
    pub id: u64,
    pub opened_url: Option<String>,
}

/// Generic outcome message used by the storage endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /_worker/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Name of the current cache generation
    pub generation: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(generation: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            generation: generation.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
