//! Error types for the identity checker.

use thiserror::Error;

use crate::Violation;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifierError {
    /// A column does not have as many rows as the constant columns.
    #[error("column {column} has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// At least one identity does not hold.
    #[error("{count} identity violations, first: {first}")]
    IdentitiesViolated { count: usize, first: Violation },
}

pub type Result<T> = std::result::Result<T, VerifierError>;
