//! Leave type (spec §3).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use crate::Id;

/// A date range (both ends inclusive) during which the task's resource is
/// unavailable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Leave {
    pub task_id: Id,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl Leave {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.date_from > self.date_to {
            return Err(DomainError::InvalidLeaveRange {
                task_id: self.task_id,
                date_from: self.date_from,
                date_to: self.date_to,
            });
        }
        Ok(())
    }

    /// True if `date` falls within `[date_from, date_to]` inclusive.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.date_from <= date && date <= self.date_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn rejects_inverted_range() {
        let leave = Leave {
            task_id: 1,
            date_from: d("2026-02-10"),
            date_to: d("2026-02-01"),
        };
        assert!(leave.validate().is_err());
    }

    #[test]
    fn covers_is_inclusive_on_both_ends() {
        let leave = Leave {
            task_id: 1,
            date_from: d("2026-02-01"),
            date_to: d("2026-02-03"),
        };
        assert!(leave.covers(d("2026-02-01")));
        assert!(leave.covers(d("2026-02-03")));
        assert!(!leave.covers(d("2026-02-04")));
    }
}
