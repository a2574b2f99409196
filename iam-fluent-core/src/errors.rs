//! Error types for ARN template handling and statement rendering.

use thiserror::Error;

/// Errors raised while parsing or filling an ARN template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnError {
    /// A `${` opened a placeholder that never closed.
    #[error("unterminated placeholder at byte {position} in ARN template {template:?}")]
    UnterminatedPlaceholder {
        /// The offending template string.
        template: String,
        /// Byte offset of the `${` that never closed.
        position: usize,
    },

    /// A placeholder had no name (`${}`).
    #[error("empty placeholder name in ARN template {template:?}")]
    EmptyPlaceholder {
        /// The offending template string.
        template: String,
    },

    /// A required placeholder was left without a value.
    #[error("no value supplied for placeholder ${{{name}}} in ARN template {template:?}")]
    UnfilledPlaceholder {
        /// The offending template string.
        template: String,
        /// Name of the slot that was not filled.
        name: String,
    },
}

/// Errors surfaced when a statement is rendered.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A chained resource call failed to resolve its ARN template.
    #[error(transparent)]
    Arn(#[from] ArnError),

    /// The rendered statement could not be serialized.
    #[error("failed to serialize policy statement: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PolicyError>;
