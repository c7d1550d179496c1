//! Error types for line balancing.
//!
//! Per-candidate problems (infeasible assignments, construction stalls)
//! are not errors: they surface as violations on a [`Solution`] or as a
//! `None` from a builder. Only problems that block a whole run end up here.
//!
//! [`Solution`]: crate::models::Solution

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias for line balancing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by problem construction, search and interchange.
#[derive(Debug, Error)]
pub enum Error {
    /// The problem definition failed validation (cycles, dangling references, ...).
    #[error("Invalid problem: {}", join_messages(.0))]
    InvalidProblem(Vec<ValidationError>),

    /// A task id that is not part of the problem.
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// A precedence edge from a task to itself.
    #[error("Task '{0}' cannot precede itself")]
    SelfPrecedence(String),

    /// A configuration parameter outside its domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
