//! Greedy constructive scheduler (spec §4.2).
//!
//! Sorts tasks by priority (high first), walks each task's candidate list in
//! chronological order, and assigns each hour-unit to the earliest free slot
//! under a per-resource, per-hour mutual-exclusion constraint.

use std::collections::HashSet;

use tracing::{instrument, trace};

use crate::domain::{Assignment, DomainModel};
use crate::Id;

/// Result of one greedy pass: the partial assignment set plus the list of
/// tasks that could not be fully placed.
#[derive(Debug, Clone, Default)]
pub struct GreedyOutcome {
    pub assignments: Vec<Assignment>,
    /// `(task_id, hours_still_needed)` for every task that did not reach
    /// `remaining_hours`.
    pub residual: Vec<(Id, u32)>,
}

impl GreedyOutcome {
    pub fn is_fully_residual(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Priority-ordered constructive scheduler (spec §4.2).
///
/// Guarantees: priority-monotone (a higher-priority task never yields its
/// preferred earliest slot to a lower-priority one), never violates resource
/// exclusivity, runs in `O(sum of candidate list lengths)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyScheduler;

impl GreedyScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Runs one greedy pass over every schedulable task in `model`.
    #[instrument(skip_all, name = "greedy_schedule")]
    pub fn schedule(&self, model: &DomainModel) -> GreedyOutcome {
        // Sort tasks by priority_score descending, ties broken by task_id
        // ascending for determinism (spec §4.2 policy 1).
        let mut tasks: Vec<_> = model.schedulable_tasks().collect();
        tasks.sort_by(|a, b| {
            b.priority_score
                .partial_cmp(&a.priority_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });

        let mut occupied: HashSet<(Id, chrono::NaiveDate, u8)> = HashSet::new();
        let mut assignments = Vec::new();
        let mut residual = Vec::new();

        for task in tasks {
            let mut remaining = task.remaining_hours;
            for slot in model.candidates(task.task_id) {
                if remaining == 0 {
                    break;
                }
                let key = (task.resource_id, slot.date, slot.hour);
                if occupied.contains(&key) {
                    continue;
                }
                occupied.insert(key);
                assignments.push(*slot);
                remaining -= 1;
            }
            if remaining > 0 {
                trace!(task_id = task.task_id, remaining, "greedy residual");
                residual.push((task.task_id, remaining));
            }
        }

        assignments.sort_by_key(|a| (a.date, a.hour, a.task_id));
        GreedyOutcome {
            assignments,
            residual,
        }
    }
}
