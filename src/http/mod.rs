//! HTTP transport module
//!
//! Provides the authenticated API client used by every check.

mod client;

pub use client::{ApiClient, TransportError};
