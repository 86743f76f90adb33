//! Agent simulation engine for Stampede
//!
//! Each [`Agent`] drives one simulated user: it keeps its own [`Session`],
//! picks actions with an [`ActionSelector`], sends them through a
//! [`Transport`] that retries transport faults and recovers from 401s, and
//! records one event per attempt into the shared metrics collector. The
//! [`Orchestrator`] sets up the agents, staggers their start and aggregates
//! the run once every agent has stopped.

pub mod actions;
pub mod agent;
pub mod auth;
pub mod error;
pub mod orchestrator;
pub mod selector;
pub mod session;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use actions::{KnownItems, ReferenceCache};
pub use agent::{Agent, AgentSettings, AgentState, StepOutcome};
pub use auth::{AuthClient, PersonaLogin, Reauthenticator, TokenPair};
pub use error::{AgentError, AuthError, OrchestratorError, TransportError};
pub use orchestrator::{AgentPlan, Orchestrator, RunOutcome};
pub use selector::{ActionSelector, Constraint};
pub use session::Session;
pub use transport::Transport;
