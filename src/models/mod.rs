//! Request and Response models for the admin API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing admin HTTP bodies and query strings.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::EntryQuery;
pub use responses::{CacheDumpResponse, HealthResponse, StatsResponse};
