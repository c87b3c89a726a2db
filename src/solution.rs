//! Solution assembler (spec §4.6): merges the assignments produced by
//! whichever algorithm path the hybrid orchestrator took into the single
//! canonical output document (spec §6).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::algorithms::{AlgorithmUsed, PlanOutcome};
use crate::Id;

/// Outcome status reported in the output document (spec §6, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OPTIMAL")]
    Optimal,
    #[serde(rename = "FEASIBLE")]
    Feasible,
    #[serde(rename = "PARTIAL")]
    Partial,
    #[serde(rename = "INFEASIBLE")]
    Infeasible,
    #[serde(rename = "TIMEOUT")]
    Timeout,
}

/// One scheduled hour in a task's assignment list (spec §6 output shape).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledHour {
    pub date: chrono::NaiveDate,
    pub hour: u8,
}

/// The external output document of one planning call (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocument {
    pub tasks: HashMap<String, Vec<ScheduledHour>>,
    pub objective_value: Option<i64>,
    pub status: Status,
    pub solve_time: f64,
    pub horizon_days: u32,
    pub algorithm_used: AlgorithmUsed,
}

/// Per-task completeness ratio, computed alongside the document but not
/// part of its wire shape (spec §4.6: "computed per task and in aggregate").
#[derive(Debug, Clone)]
pub struct CompletenessReport {
    pub per_task: HashMap<Id, f64>,
    pub aggregate: f64,
}

/// Merges a [`PlanOutcome`] into the canonical output document (spec §4.6).
#[derive(Debug, Default, Clone, Copy)]
pub struct SolutionAssembler;

impl SolutionAssembler {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, name = "assemble_solution")]
    pub fn assemble(&self, outcome: &PlanOutcome) -> PlanDocument {
        let completeness = self.completeness(outcome);

        let mut by_task: HashMap<Id, Vec<ScheduledHour>> = HashMap::new();
        for assignment in &outcome.assignments {
            by_task
                .entry(assignment.task_id)
                .or_default()
                .push(ScheduledHour {
                    date: assignment.date,
                    hour: assignment.hour,
                });
        }
        for hours in by_task.values_mut() {
            hours.sort_by_key(|h| (h.date, h.hour));
        }

        let tasks = by_task
            .into_iter()
            .map(|(id, hours)| (id.to_string(), hours))
            .collect();

        let status = self.determine_status(outcome, &completeness);

        PlanDocument {
            tasks,
            objective_value: outcome.objective_value,
            status,
            solve_time: outcome.solve_time_seconds,
            horizon_days: outcome.horizon_days,
            algorithm_used: outcome.algorithm_used,
        }
    }

    /// Computes `scheduled_hours / remaining_hours` per schedulable task
    /// (spec §4.6); structurally infeasible tasks count as 0.0.
    pub fn completeness(&self, outcome: &PlanOutcome) -> CompletenessReport {
        let mut scheduled: HashMap<Id, u32> = HashMap::new();
        for assignment in &outcome.assignments {
            *scheduled.entry(assignment.task_id).or_insert(0) += 1;
        }

        let mut per_task = HashMap::new();
        let mut sum = 0.0;
        let mut count = 0usize;
        for task in outcome.domain_model.tasks() {
            let done = *scheduled.get(&task.task_id).unwrap_or(&0) as f64;
            let ratio = if task.remaining_hours == 0 {
                1.0
            } else {
                done / task.remaining_hours as f64
            };
            per_task.insert(task.task_id, ratio);
            sum += ratio;
            count += 1;
        }

        let aggregate = if count == 0 { 1.0 } else { sum / count as f64 };
        CompletenessReport { per_task, aggregate }
    }

    /// Spec §6/§7 status rules: an exhausted horizon cap always yields
    /// `INFEASIBLE` with no assignments returned; a fully-empty result over
    /// a non-empty workload is `INFEASIBLE`; an incomplete result from a
    /// time-limited CP-SAT feasible solve is `TIMEOUT`; any other
    /// incomplete result (structural infeasibility, greedy residual) is
    /// `PARTIAL`; a fully complete result mirrors the underlying CP-SAT
    /// status, or `OPTIMAL` for greedy-only runs.
    fn determine_status(&self, outcome: &PlanOutcome, completeness: &CompletenessReport) -> Status {
        if outcome.cap_exceeded {
            return Status::Infeasible;
        }

        let total_remaining: u32 = outcome
            .domain_model
            .tasks()
            .map(|t| t.remaining_hours)
            .sum();

        if outcome.assignments.is_empty() && total_remaining > 0 {
            return Status::Infeasible;
        }

        let all_complete = completeness.per_task.values().all(|ratio| *ratio >= 1.0 - f64::EPSILON);

        if !all_complete {
            if matches!(outcome.cpsat_status, Some(crate::algorithms::CpSatStatus::Feasible)) {
                return Status::Timeout;
            }
            return Status::Partial;
        }

        match outcome.cpsat_status {
            Some(crate::algorithms::CpSatStatus::Optimal) => Status::Optimal,
            Some(crate::algorithms::CpSatStatus::Feasible) => Status::Feasible,
            _ => Status::Optimal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::HybridOrchestrator;
    use crate::domain::{CalendarSlot, Leave, Task};
    use crate::Config;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Scenario S1 at the assembled-document level.
    #[test]
    fn s1_single_task_single_window() {
        let config = Config::default();
        let outcome = HybridOrchestrator::new()
            .plan(
                vec![Task {
                    task_id: 1,
                    name: "t1".into(),
                    resource_id: 1,
                    remaining_hours: 3,
                    priority_score: 50.0,
                }],
                vec![CalendarSlot {
                    task_id: 1,
                    dayofweek: 0,
                    hour_from: 9,
                    hour_to: 17,
                }],
                vec![],
                d("2026-02-02"),
                &config,
            )
            .unwrap();

        let doc = SolutionAssembler::new().assemble(&outcome);
        assert_eq!(doc.status, Status::Optimal);
        assert_eq!(doc.horizon_days, 28);
        let hours = &doc.tasks["1"];
        assert_eq!(hours.len(), 3);
        assert_eq!(hours[0].hour, 9);
    }

    /// Scenario S5: structural infeasibility yields PARTIAL and the
    /// infeasible task is absent from the output.
    #[test]
    fn s5_structural_infeasibility_yields_partial() {
        let config = Config::default();
        let outcome = HybridOrchestrator::new()
            .plan(
                vec![
                    Task {
                        task_id: 1,
                        name: "t1".into(),
                        resource_id: 1,
                        remaining_hours: 3,
                        priority_score: 50.0,
                    },
                    Task {
                        task_id: 2,
                        name: "t2".into(),
                        resource_id: 2,
                        remaining_hours: 3,
                        priority_score: 50.0,
                    },
                ],
                vec![CalendarSlot {
                    task_id: 1,
                    dayofweek: 0,
                    hour_from: 9,
                    hour_to: 17,
                }],
                vec![],
                d("2026-02-02"),
                &config,
            )
            .unwrap();

        let doc = SolutionAssembler::new().assemble(&outcome);
        assert_eq!(doc.status, Status::Partial);
        assert!(!doc.tasks.contains_key("2"));
    }

    #[test]
    fn leave_covering_the_whole_horizon_is_infeasible() {
        let config = Config::default();
        let outcome = HybridOrchestrator::new()
            .plan(
                vec![Task {
                    task_id: 1,
                    name: "t1".into(),
                    resource_id: 1,
                    remaining_hours: 3,
                    priority_score: 50.0,
                }],
                vec![CalendarSlot {
                    task_id: 1,
                    dayofweek: 0,
                    hour_from: 9,
                    hour_to: 17,
                }],
                vec![Leave {
                    task_id: 1,
                    date_from: d("2026-02-02"),
                    date_to: d("2040-01-01"),
                }],
                d("2026-02-02"),
                &config,
            )
            .unwrap();

        let doc = SolutionAssembler::new().assemble(&outcome);
        assert_eq!(doc.status, Status::Infeasible);
        assert!(doc.tasks.is_empty());
    }
}
