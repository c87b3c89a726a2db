//! Crate-wide error types.

use thiserror::Error;

/// Top-level error returned across the planning call boundary.
///
/// Per the error-handling design, only invalid input ever escapes as an
/// error; structural infeasibility, solver timeouts, and horizon-cap
/// exhaustion are all folded into the output document's `status` field
/// instead (see [`crate::solution::Status`]).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// A required column was missing, a date failed to parse, or a field
    /// violated its invariant (negative hours, `hour_from >= hour_to`,
    /// `dayofweek` out of range, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl PlanError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PlanError::InvalidInput(msg.into())
    }
}

impl From<crate::domain::DomainError> for PlanError {
    fn from(err: crate::domain::DomainError) -> Self {
        PlanError::invalid(err.to_string())
    }
}
