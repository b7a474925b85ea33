//! API Module
//!
//! HTTP handlers and routing for the caching proxy.
//!
//! # Endpoints
//! - `/_worker/*` - cache lifecycle, stats, notifications and local storage
//! - everything else - intercepted: current cache generation first, then the origin

pub mod handlers;
pub mod proxy;
pub mod routes;

pub use handlers::*;
pub use proxy::SOURCE_HEADER;
pub use routes::create_router;
