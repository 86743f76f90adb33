//! Core error types

use thiserror::Error;

/// Result type alias for core parsing operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while parsing or validating domain values
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown action: '{0}'")]
    UnknownAction(String),

    #[error("Unknown role: '{0}'. Supported roles are: elevated, standard")]
    UnknownRole(String),

    #[error("Unknown pace: '{0}'. Supported paces are: fast, normal, slow")]
    UnknownPace(String),

    #[error("Duplicate action in weight table: {0}")]
    DuplicateAction(String),

    #[error("Invalid persona: {0}")]
    InvalidPersona(String),
}
