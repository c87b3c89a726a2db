//! Domain-level errors.

use thiserror::Error;

/// Errors raised while validating raw input rows into domain types.
///
/// All variants fold into [`crate::PlanError::InvalidInput`] at the crate
/// boundary; nothing here is recoverable by the caller beyond fixing the
/// input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("task {task_id}: priority_score must be in [0, 100], got {priority_score}")]
    PriorityOutOfRange { task_id: crate::Id, priority_score: String },

    #[error("calendar slot for task {task_id}: dayofweek must be in 0..=6, got {dayofweek}")]
    DayOfWeekOutOfRange { task_id: crate::Id, dayofweek: i64 },

    #[error(
        "calendar slot for task {task_id}: hour_from ({hour_from}) must be < hour_to ({hour_to}), both in 0..=24"
    )]
    InvalidHourRange {
        task_id: crate::Id,
        hour_from: i64,
        hour_to: i64,
    },

    #[error("leave for task {task_id}: date_from ({date_from}) must be <= date_to ({date_to})")]
    InvalidLeaveRange {
        task_id: crate::Id,
        date_from: chrono::NaiveDate,
        date_to: chrono::NaiveDate,
    },

    #[error("horizon_days must be > 0, got {0}")]
    InvalidHorizon(u32),
}
