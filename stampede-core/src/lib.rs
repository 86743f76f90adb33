//! Core domain types for Stampede
//!
//! Value objects shared by every other crate in the workspace: the action
//! catalogue, personas, the weight table and the per-action event record.
//! Nothing in here performs I/O.

pub mod error;
pub mod event;
pub mod types;
pub mod weights;

pub use error::{CoreError, Result};
pub use event::ActionEvent;
pub use types::{default_personas, ActionKind, Pace, Persona, Role};
pub use weights::WeightTable;
