//! Request DTOs for the worker control API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /_worker/install
///
/// Installs the given version, or the current one when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstallRequest {
    #[serde(default)]
    pub version: Option<String>,
}

/// Request body for POST /_worker/upgrade
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeRequest {
    /// Version tag of the new cache generation
    pub version: String,
}

impl UpgradeRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.version.trim().is_empty() {
            return Some("Version cannot be empty".to_string());
        }
        None
    }
}

/// Request body for POST /_worker/storage/auth
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
