//! Cache Module
//!
//! Provides versioned cache generations mapping request identity to stored responses.

mod entry;
mod generation;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry, RequestKey, StoredResponse};
pub use generation::Generation;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Substring marking a request as an API call eligible for the offline payload
pub const API_PATH_MARKER: &str = "/api/";

/// Formats the generation name for a version, e.g. `plati-market-cache-v1`.
pub fn generation_name(prefix: &str, version: &str) -> String {
    format!("{}-{}", prefix, version)
}
