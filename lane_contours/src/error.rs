//! Error type returned by fallible geometry operations.

use thiserror::Error;

/// Errors surfaced to callers.
///
/// Degenerate but recoverable geometry is not an error, it is reported through
/// [crate::diagnostics::Diagnostics] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index {index} out of range for {len} points")]
    OutOfRange { index: usize, len: usize },

    #[error("clothoid solve did not converge after {iterations} iterations")]
    NoConvergence { iterations: usize },
}

impl GeometryError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GeometryError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GeometryError>;
