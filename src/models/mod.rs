//! Request and Response models for the worker control API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{InstallRequest, LoginRequest, UpgradeRequest};
pub use responses::{
    ActivateResponse, ClickResponse, GenerationsResponse, HealthResponse, MessageResponse,
    OfflineResponse, StatsResponse,
};
