use thiserror::Error;

/// Failure modes shared by every model calculator. User input errors are
/// recoverable and carry enough context to point at the offending field.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("{reason} on the {side} side of row {row} and column {column}")]
    PayoffCell {
        side: &'static str,
        row: usize,
        column: usize,
        reason: String,
    },

    #[error("{what} must be positive, got {value}")]
    NonPositive { what: String, value: String },

    #[error("no unique {what}: {reason}")]
    NoUniqueSolution { what: String, reason: String },

    #[error("symbolic computation failed: {0}")]
    Symbolic(String),

    #[error("plot rendering failed: {0}")]
    Plot(String),
}

impl ModelError {
    pub fn parse(input: &str, reason: impl Into<String>) -> ModelError {
        ModelError::Parse {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn no_unique(what: &str, reason: impl Into<String>) -> ModelError {
        ModelError::NoUniqueSolution {
            what: what.to_owned(),
            reason: reason.into(),
        }
    }
}
