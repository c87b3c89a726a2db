//! Task type (spec §3).

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use crate::Id;

/// A work task to be scheduled onto its assigned resource's working hours.
///
/// # Invariants
///
/// - `remaining_hours >= 0`.
/// - `priority_score` is a real number in `[0, 100]`.
///
/// Tasks with `remaining_hours == 0` are valid but are dropped before
/// scheduling begins (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(rename = "id")]
    pub task_id: Id,
    pub name: String,
    /// The resource (`user_id` in the source system) this task is bound to.
    #[serde(rename = "user_id")]
    pub resource_id: Id,
    pub remaining_hours: u32,
    #[serde(default = "default_priority")]
    pub priority_score: f64,
}

fn default_priority() -> f64 {
    50.0
}

impl Task {
    /// Validates the invariants on this task.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=100.0).contains(&self.priority_score) || self.priority_score.is_nan() {
            return Err(DomainError::PriorityOutOfRange {
                task_id: self.task_id,
                priority_score: self.priority_score.to_string(),
            });
        }
        Ok(())
    }

    /// True once every required hour has been placed.
    pub fn is_complete(&self, scheduled_hours: u32) -> bool {
        scheduled_hours >= self.remaining_hours
    }
}
