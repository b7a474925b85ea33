//! Cache Lifecycle
//!
//! Install populates a generation from the manifest; activate deletes every
//! other generation.

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::Worker;
use crate::cache::{generation_name, Generation};
use crate::error::{CacheError, Result};
use crate::network::NetworkRequest;

/// Outcome of a successful install.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InstallReport {
    pub generation: String,
    pub entries: usize,
}

/// Outcome of a successful upgrade.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpgradeReport {
    pub previous_version: String,
    pub version: String,
    pub install: InstallReport,
    pub deleted: Vec<String>,
}

fn validate_version(version: &str) -> Result<()> {
    if version.trim().is_empty() {
        return Err(CacheError::InvalidRequest(
            "Version cannot be empty".to_string(),
        ));
    }
    if version.chars().any(char::is_whitespace) {
        return Err(CacheError::InvalidRequest(
            "Version cannot contain whitespace".to_string(),
        ));
    }
    Ok(())
}

impl Worker {
    // == Install ==
    /// Fetches every manifest entry and stores them as the generation for `version`.
    ///
    /// All-or-nothing: if any entry fails to fetch or answers with a non-2xx
    /// status, nothing is written. On success the generation holds exactly
    /// the manifest entries, replacing whatever it held before.
    pub async fn install(&self, version: &str) -> Result<InstallReport> {
        validate_version(version)?;
        let name = generation_name(&self.settings.cache_prefix, version);
        info!(
            "Installing {} ({} manifest entries)",
            name,
            self.settings.manifest.len()
        );

        let mut requests = Vec::with_capacity(self.settings.manifest.len());
        for path in &self.settings.manifest {
            requests.push(NetworkRequest::get(self.resolve(path)?));
        }

        let mut fetches = JoinSet::new();
        for request in requests {
            let fetcher = self.fetcher.clone();
            fetches.spawn(async move {
                let result = fetcher.fetch(&request).await;
                (request, result)
            });
        }

        let mut generation = Generation::new();
        while let Some(joined) = fetches.join_next().await {
            let (request, result) = joined.map_err(|e| CacheError::Internal(e.to_string()))?;
            let response = match result {
                Ok(network) if (200..300).contains(&network.status()) => network.response,
                Ok(network) => {
                    fetches.abort_all();
                    warn!("Install of {} failed: {} -> {}", name, request.url, network.status());
                    return Err(CacheError::InstallFailed(format!(
                        "{} answered with status {}",
                        request.url,
                        network.status()
                    )));
                }
                Err(err) => {
                    fetches.abort_all();
                    warn!("Install of {} failed: {} -> {}", name, request.url, err);
                    return Err(CacheError::InstallFailed(format!("{}: {}", request.url, err)));
                }
            };
            generation.put(request.key(), response);
        }

        let entries = generation.len();
        self.cache.write().await.replace(&name, generation);
        info!("Installed {} with {} entries", name, entries);

        Ok(InstallReport {
            generation: name,
            entries,
        })
    }

    // == Activate ==
    /// Deletes every generation except the current one.
    ///
    /// Returns the deleted generation names. Running it again without a
    /// version change deletes nothing.
    pub async fn activate(&self) -> Vec<String> {
        let current = self.current_generation().await;
        let mut cache = self.cache.write().await;

        let stale: Vec<String> = cache
            .keys()
            .into_iter()
            .filter(|name| *name != current)
            .collect();
        for name in &stale {
            cache.delete(name);
            info!("Deleted stale cache generation {}", name);
        }
        cache.stats_mut().record_generations_deleted(stale.len());

        info!("Activated {} ({} stale removed)", current, stale.len());
        stale
    }

    // == Upgrade ==
    /// Installs `version`, makes it current, then activates.
    ///
    /// If install fails the current version is left untouched.
    pub async fn upgrade(&self, version: &str) -> Result<UpgradeReport> {
        let install = self.install(version).await?;

        let previous_version = {
            let mut current = self.version.write().await;
            std::mem::replace(&mut *current, version.to_string())
        };
        let deleted = self.activate().await;

        Ok(UpgradeReport {
            previous_version,
            version: version.to_string(),
            install,
            deleted,
        })
    }
}
