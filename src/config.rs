//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::worker::manifest::default_manifest;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Origin the proxy forwards cache misses to
    pub origin_url: String,
    /// Prefix of every cache generation name
    pub cache_prefix: String,
    /// Version tag of the current cache generation
    pub cache_version: String,
    /// Asset paths cached eagerly on install
    pub manifest: Vec<String>,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `ORIGIN_URL` - Storefront origin (default: http://127.0.0.1:8080)
    /// - `CACHE_PREFIX` - Generation name prefix (default: plati-market-cache)
    /// - `CACHE_VERSION` - Current generation version (default: v1)
    /// - `CACHE_MANIFEST` - Comma-separated asset paths (default: built-in manifest)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            origin_url: env::var("ORIGIN_URL").unwrap_or(defaults.origin_url),
            cache_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.cache_prefix),
            cache_version: env::var("CACHE_VERSION").unwrap_or(defaults.cache_version),
            manifest: env::var("CACHE_MANIFEST")
                .ok()
                .map(|v| parse_manifest(&v))
                .filter(|paths| !paths.is_empty())
                .unwrap_or(defaults.manifest),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or(defaults.upstream_timeout),
        }
    }

    /// Returns the upstream timeout as a Duration.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            origin_url: "http://127.0.0.1:8080".to_string(),
            cache_prefix: "plati-market-cache".to_string(),
            cache_version: "v1".to_string(),
            manifest: default_manifest(),
            upstream_timeout: 30,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Splits a comma-separated manifest, dropping blanks.
fn parse_manifest(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
