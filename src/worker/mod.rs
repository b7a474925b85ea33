//! Worker Module
//!
//! The offline worker: a request interceptor backed by versioned cache
//! generations, plus the install/activate lifecycle that manages them.
//!
//! # Operations
//! - `intercept` - cache-then-network resolution with write-back
//! - `install` - populate a generation from the manifest (all-or-nothing)
//! - `activate` - delete every generation but the current one
//! - `upgrade` - install a new version, switch to it, activate

mod interceptor;
mod lifecycle;
pub mod manifest;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use url::Url;

use crate::cache::{generation_name, CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::network::Fetcher;

pub use interceptor::{is_api_request, Interception, Source};
pub use lifecycle::{InstallReport, UpgradeReport};

// == Worker Settings ==
/// Static worker parameters.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub origin: Url,
    pub cache_prefix: String,
    pub cache_version: String,
    pub manifest: Vec<String>,
}

impl WorkerSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let origin = Url::parse(&config.origin_url).map_err(|e| {
            CacheError::InvalidRequest(format!("invalid origin '{}': {}", config.origin_url, e))
        })?;

        Ok(Self {
            origin,
            cache_prefix: config.cache_prefix.clone(),
            cache_version: config.cache_version.clone(),
            manifest: config.manifest.clone(),
        })
    }
}

// == Generation Info ==
/// Summary of one cache generation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerationInfo {
    pub name: String,
    pub entries: usize,
    pub current: bool,
    /// Write time (Unix ms) of the newest entry, if any
    pub last_stored_at: Option<u64>,
}

// == Worker ==
/// Handle to the worker. Cheap to clone; clones share the same cache.
#[derive(Clone)]
pub struct Worker {
    cache: Arc<RwLock<CacheStore>>,
    fetcher: Arc<dyn Fetcher>,
    version: Arc<RwLock<String>>,
    settings: Arc<WorkerSettings>,
}

impl Worker {
    /// Creates a worker with an empty cache. The current generation is opened
    /// immediately so write-back always has a target.
    pub fn new(settings: WorkerSettings, fetcher: Arc<dyn Fetcher>) -> Self {
        let mut store = CacheStore::new();
        store.open(&generation_name(
            &settings.cache_prefix,
            &settings.cache_version,
        ));

        Self {
            cache: Arc::new(RwLock::new(store)),
            fetcher,
            version: Arc::new(RwLock::new(settings.cache_version.clone())),
            settings: Arc::new(settings),
        }
    }

    /// Shared cache handle.
    pub fn cache(&self) -> Arc<RwLock<CacheStore>> {
        self.cache.clone()
    }

    pub fn settings(&self) -> &WorkerSettings {
        &self.settings
    }

    /// The current version tag.
    pub async fn version(&self) -> String {
        self.version.read().await.clone()
    }

    /// Name of the current cache generation.
    pub async fn current_generation(&self) -> String {
        let version = self.version.read().await;
        generation_name(&self.settings.cache_prefix, &version)
    }

    /// Resolves a request path against the origin.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        manifest::resolve(&self.settings.origin, path)
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Generations ==
    /// Lists all generations, flagging the current one.
    pub async fn generations(&self) -> Vec<GenerationInfo> {
        let current = self.current_generation().await;
        let cache = self.cache.read().await;

        cache
            .keys()
            .into_iter()
            .map(|name| {
                let generation = cache.generation(&name);
                GenerationInfo {
                    entries: generation.map(|g| g.len()).unwrap_or_default(),
                    last_stored_at: generation.and_then(|g| g.last_stored_at()),
                    current: name == current,
                    name,
                }
            })
            .collect()
    }
}
