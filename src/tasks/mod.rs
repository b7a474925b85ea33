//! Background Tasks Module
//!
//! Contains work the proxy schedules off the request path.
//!
//! # Tasks
//! - Cache write-back: stores a network response after it has been served

mod write_back;

pub use write_back::spawn_cache_write;
