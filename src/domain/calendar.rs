//! Calendar slot type (spec §3).

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use crate::Id;

/// A per-task weekly working window.
///
/// Interpretation: on `dayofweek` (`0` = Monday … `6` = Sunday), the task's
/// resource has the continuous working window `[hour_from, hour_to)`. A task
/// may have several calendar slots per day (multiple windows).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarSlot {
    pub task_id: Id,
    pub dayofweek: u8,
    pub hour_from: u8,
    pub hour_to: u8,
}

impl CalendarSlot {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.dayofweek > 6 {
            return Err(DomainError::DayOfWeekOutOfRange {
                task_id: self.task_id,
                dayofweek: self.dayofweek as i64,
            });
        }
        if self.hour_from >= self.hour_to || self.hour_to > 24 {
            return Err(DomainError::InvalidHourRange {
                task_id: self.task_id,
                hour_from: self.hour_from as i64,
                hour_to: self.hour_to as i64,
            });
        }
        Ok(())
    }

    /// The hours of this slot, as `[hour_from, hour_to)`.
    pub fn hours(&self) -> impl Iterator<Item = u8> {
        self.hour_from..self.hour_to
    }
}
