//! Consecutive-failure circuit breaker
//!
//! Unlike a service-side breaker this one never half-opens: once tripped it
//! stays open for the lifetime of its owner. Between the back-off threshold
//! and the trip threshold the owner is expected to slow down.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Healthy, no extra delay
    Closed,
    /// Degraded, owner should insert its back-off delay
    BackingOff,
    /// Tripped permanently, owner must stop
    Open,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::BackingOff => write!(f, "backing-off"),
            CircuitState::Open => write!(f, "open"),
        }
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before back-off starts
    pub backoff_threshold: u32,

    /// Consecutive failures that open the circuit for good
    pub failure_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            backoff_threshold: 5,
            failure_threshold: 20,
        }
    }
}

/// Per-owner breaker counting consecutive failures
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    consecutive_failures: u32,
    total_failures: u64,
    total_successes: u64,
    open: bool,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            consecutive_failures: 0,
            total_failures: 0,
            total_successes: 0,
            open: false,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Get the current state
    pub fn state(&self) -> CircuitState {
        if self.open {
            CircuitState::Open
        } else if self.consecutive_failures >= self.config.backoff_threshold {
            CircuitState::BackingOff
        } else {
            CircuitState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn total_failures(&self) -> u64 {
        self.total_failures
    }

    pub fn total_successes(&self) -> u64 {
        self.total_successes
    }

    /// Record a successful operation, resetting the consecutive count
    pub fn record_success(&mut self) -> CircuitState {
        self.total_successes += 1;
        if !self.open {
            if self.consecutive_failures >= self.config.backoff_threshold {
                info!(
                    "Recovered after {} consecutive failures",
                    self.consecutive_failures
                );
            }
            self.consecutive_failures = 0;
        }
        self.state()
    }

    /// Record a failed operation
    pub fn record_failure(&mut self) -> CircuitState {
        self.total_failures += 1;
        if self.open {
            return CircuitState::Open;
        }

        self.consecutive_failures += 1;
        if self.consecutive_failures >= self.config.failure_threshold {
            self.open = true;
            warn!(
                "Circuit breaker opened after {} consecutive failures",
                self.consecutive_failures
            );
        } else if self.consecutive_failures == self.config.backoff_threshold {
            warn!(
                "Backing off after {} consecutive failures",
                self.consecutive_failures
            );
        }
        self.state()
    }
}
