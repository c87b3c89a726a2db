//! Candidate slot units and assignments (spec §3).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Id;

/// A derived atom `(task_id, date, hour)`. It is a *candidate* iff it
/// survives calendar and leave filtering (spec §3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SlotUnit {
    pub task_id: Id,
    pub date: NaiveDate,
    pub hour: u8,
}

impl SlotUnit {
    pub fn new(task_id: Id, date: NaiveDate, hour: u8) -> Self {
        Self {
            task_id,
            date,
            hour,
        }
    }
}

/// A chosen candidate slot unit — an entry in the solution.
pub type Assignment = SlotUnit;
