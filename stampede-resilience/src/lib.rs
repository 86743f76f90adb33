//! Resilience patterns for Stampede
//!
//! This crate provides the fixed-delay retry executor used by the transport,
//! the consecutive-failure circuit breaker that halts a runaway agent, and
//! the cooperative stop signal shared by every agent task.

pub mod circuit_breaker;
pub mod retry;
pub mod stop;

// Re-export commonly used types
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use retry::{RetryError, RetryExecutor, RetryPolicy, Retryable};
pub use stop::{StopReason, StopSource, StopToken};
