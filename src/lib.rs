//! Storefront Cache - an offline-first caching proxy for the storefront shell
//!
//! Serves requests from a versioned cache generation, falls back to the
//! origin, and answers API calls with an offline payload when the network is gone.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod local;
pub mod models;
pub mod network;
pub mod notify;
pub mod tasks;
pub mod worker;

pub use api::AppState;
pub use config::Config;
pub use worker::Worker;
