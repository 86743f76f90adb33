//! HTTP client functionality for Stampede
//!
//! This crate provides the [`HttpClient`] seam every agent talks through,
//! a reqwest-backed implementation, and the request/response types used by
//! the transport layer.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpClient, ReqwestClient};
pub use config::HttpConfig;
pub use errors::HttpError;
pub use types::{ApiRequest, ApiResponse, HttpMethod, HttpMethodError};
