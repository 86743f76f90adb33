//! Logging infrastructure for Stampede
//!
//! Thin wrapper around `tracing-subscriber` that turns a
//! [`LoggingConfig`](stampede_config::LoggingConfig) into a global subscriber.

pub mod init;

pub use init::{env_filter_for, init_logging, init_simple_tracing};
