//! Hybrid orchestrator (spec §4.4): classifies the workload, routes to
//! greedy or CP-SAT, optionally cleans up the greedy residual with a
//! restricted CP-SAT pass, and falls back to full CP-SAT if greedy
//! produced nothing.

use std::collections::HashSet;
use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::cpsat::{CpSatScheduler, CpSatStatus};
use super::greedy::GreedyScheduler;
use super::horizon::HorizonController;
use crate::config::Config;
use crate::domain::{Assignment, CalendarSlot, DomainError, DomainModel, Leave, Task};
use crate::Id;

/// Which path the orchestrator took to produce a solution (spec §4.4,
/// reported in the output document as `algorithm_used`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmUsed {
    Greedy,
    Ortools,
    HybridGreedyOrtools,
    OrtoolsFallback,
}

/// Full result of one orchestrated planning call, before assembly into the
/// external output document (spec §4.6 consumes this).
pub struct PlanOutcome {
    pub domain_model: DomainModel,
    pub assignments: Vec<Assignment>,
    pub objective_value: Option<i64>,
    pub algorithm_used: AlgorithmUsed,
    pub cpsat_status: Option<CpSatStatus>,
    pub solve_time_seconds: f64,
    pub horizon_days: u32,
    pub cap_exceeded: bool,
}

/// Routes a planning call to the greedy or CP-SAT scheduler (spec §4.4).
#[derive(Debug, Default, Clone, Copy)]
pub struct HybridOrchestrator;

impl HybridOrchestrator {
    pub fn new() -> Self {
        Self
    }

    /// Runs one full planning call: build the domain model at the initial
    /// horizon, classify the workload, and route accordingly.
    #[instrument(skip_all, name = "hybrid_orchestrator")]
    pub fn plan(
        &self,
        tasks: Vec<Task>,
        calendar_slots: Vec<CalendarSlot>,
        leaves: Vec<Leave>,
        start_date: NaiveDate,
        config: &Config,
    ) -> Result<PlanOutcome, DomainError> {
        let initial_model = DomainModel::build(
            tasks.clone(),
            calendar_slots.clone(),
            leaves.clone(),
            start_date,
            config.initial_horizon_days.max(1),
        )?;

        let route_to_greedy = !config.hybrid_mode || self.should_route_to_greedy(&initial_model, config);

        if route_to_greedy {
            return Ok(self.greedy_first_flow(
                initial_model,
                tasks,
                calendar_slots,
                leaves,
                start_date,
                config,
            ));
        }

        info!("routing to ortools");
        let start = Instant::now();
        let horizon = HorizonController::new().solve(tasks, calendar_slots, leaves, start_date, config)?;
        Ok(PlanOutcome {
            domain_model: horizon.domain_model,
            assignments: horizon.cpsat.assignments,
            objective_value: horizon.cpsat.objective_value,
            algorithm_used: AlgorithmUsed::Ortools,
            cpsat_status: Some(horizon.cpsat.status),
            solve_time_seconds: start.elapsed().as_secs_f64(),
            horizon_days: horizon.horizon_days,
            cap_exceeded: horizon.cap_exceeded,
        })
    }

    /// `N > threshold_tasks || H > threshold_hours || U > threshold_users
    /// || A > threshold_avg_hours` (spec §4.4 routing).
    fn should_route_to_greedy(&self, model: &DomainModel, config: &Config) -> bool {
        let n = model.schedulable_tasks().count();
        let h = model.total_remaining_hours();
        let u = model.resource_count();
        let a = h as f64 / n.max(1) as f64;

        n > config.greedy_threshold_tasks
            || h > config.greedy_threshold_hours
            || u > config.greedy_threshold_users
            || a > config.greedy_threshold_avg_hours
    }

    /// Greedy-first flow (spec §4.4): run greedy; if the residual is small
    /// enough, clean it up with a restricted CP-SAT pass; if greedy
    /// produced nothing at all, fall back to full horizon-controlled
    /// CP-SAT.
    fn greedy_first_flow(
        &self,
        initial_model: DomainModel,
        tasks: Vec<Task>,
        calendar_slots: Vec<CalendarSlot>,
        leaves: Vec<Leave>,
        start_date: NaiveDate,
        config: &Config,
    ) -> PlanOutcome {
        let start = Instant::now();
        info!("routing to greedy");
        let greedy_outcome = GreedyScheduler::new().schedule(&initial_model);

        if greedy_outcome.is_fully_residual() && !greedy_outcome.residual.is_empty() {
            info!("greedy produced zero assignments, falling back to full ortools");
            let horizon = HorizonController::new()
                .solve(tasks, calendar_slots, leaves, start_date, config)
                // The domain model was already validated once above; a
                // second validation of the same (cloned) inputs cannot
                // fail, so this is unreachable in practice.
                .unwrap_or_else(|_| unreachable!("inputs were already validated"));
            return PlanOutcome {
                domain_model: horizon.domain_model,
                assignments: horizon.cpsat.assignments,
                objective_value: horizon.cpsat.objective_value,
                algorithm_used: AlgorithmUsed::OrtoolsFallback,
                cpsat_status: Some(horizon.cpsat.status),
                solve_time_seconds: start.elapsed().as_secs_f64(),
                horizon_days: horizon.horizon_days,
                cap_exceeded: horizon.cap_exceeded,
            };
        }

        if greedy_outcome.residual.is_empty() || greedy_outcome.residual.len() > config.hybrid_residual_cap {
            return PlanOutcome {
                domain_model: initial_model,
                assignments: greedy_outcome.assignments,
                objective_value: None,
                algorithm_used: AlgorithmUsed::Greedy,
                cpsat_status: None,
                solve_time_seconds: start.elapsed().as_secs_f64(),
                horizon_days: config.initial_horizon_days.max(1),
                cap_exceeded: false,
            };
        }

        // Residual cleanup: restrict CP-SAT to the residual task ids and
        // the resource-hours not already occupied by greedy.
        let restrict_to: HashSet<Id> = greedy_outcome.residual.iter().map(|(id, _)| *id).collect();
        let occupied: HashSet<(Id, NaiveDate, u8)> = greedy_outcome
            .assignments
            .iter()
            .map(|a| {
                let resource_id = initial_model
                    .task(a.task_id)
                    .map(|t| t.resource_id)
                    .unwrap_or(a.task_id);
                (resource_id, a.date, a.hour)
            })
            .collect();

        let mut fallback_config = config.clone();
        fallback_config.ortools_time_limit_seconds = config.ortools_fallback_timeout;

        let cpsat_outcome = CpSatScheduler::new().solve_restricted(
            &initial_model,
            &fallback_config,
            Some(&restrict_to),
            &occupied,
        );

        let mut assignments = greedy_outcome.assignments;
        assignments.extend(cpsat_outcome.assignments.iter().copied());
        assignments.sort_by_key(|a| (a.date, a.hour, a.task_id));

        PlanOutcome {
            domain_model: initial_model,
            assignments,
            objective_value: cpsat_outcome.objective_value,
            algorithm_used: AlgorithmUsed::HybridGreedyOrtools,
            cpsat_status: Some(cpsat_outcome.status),
            solve_time_seconds: start.elapsed().as_secs_f64(),
            horizon_days: config.initial_horizon_days.max(1),
            cap_exceeded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(id: Id, resource_id: Id, hours: u32, priority: f64) -> Task {
        Task {
            task_id: id,
            name: format!("t{id}"),
            resource_id,
            remaining_hours: hours,
            priority_score: priority,
        }
    }

    fn slot(task_id: Id, dayofweek: u8, from: u8, to: u8) -> CalendarSlot {
        CalendarSlot {
            task_id,
            dayofweek,
            hour_from: from,
            hour_to: to,
        }
    }

    /// Scenario S6: a workload sized past the greedy thresholds routes to
    /// greedy (or the hybrid cleanup path), never to pure CP-SAT.
    #[test]
    fn s6_large_workload_routes_to_greedy() {
        let mut tasks = Vec::new();
        let mut slots = Vec::new();
        for i in 0..60 {
            let resource = (i % 12) as Id + 1;
            tasks.push(task(i as Id + 1, resource, 5, 50.0));
            slots.push(slot(i as Id + 1, 0, 9, 17));
        }

        let config = Config::default();
        let outcome = HybridOrchestrator::new()
            .plan(tasks, slots, vec![], d("2026-02-02"), &config)
            .unwrap();

        assert!(matches!(
            outcome.algorithm_used,
            AlgorithmUsed::Greedy | AlgorithmUsed::HybridGreedyOrtools
        ));

        let mut seen = HashSet::new();
        for a in &outcome.assignments {
            let resource = outcome.domain_model.task(a.task_id).unwrap().resource_id;
            assert!(seen.insert((resource, a.date, a.hour)));
        }
    }

    /// Scenario S5: structural infeasibility alongside a solvable task.
    #[test]
    fn s5_structural_infeasibility_alongside_solvable_task() {
        let config = Config::default();
        let outcome = HybridOrchestrator::new()
            .plan(
                vec![task(1, 1, 3, 50.0), task(2, 2, 3, 50.0)],
                vec![slot(1, 0, 9, 17)], // task 2 has no calendar slot at all
                vec![],
                d("2026-02-02"),
                &config,
            )
            .unwrap();

        assert!(outcome.domain_model.infeasible_tasks().contains(&2));
        assert!(outcome.assignments.iter().any(|a| a.task_id == 1));
        assert!(outcome.assignments.iter().all(|a| a.task_id != 2));
    }

    /// Small workloads under every threshold route to CP-SAT.
    #[test]
    fn small_workload_routes_to_ortools() {
        let config = Config::default();
        let outcome = HybridOrchestrator::new()
            .plan(
                vec![task(1, 1, 3, 50.0)],
                vec![slot(1, 0, 9, 17)],
                vec![],
                d("2026-02-02"),
                &config,
            )
            .unwrap();
        assert_eq!(outcome.algorithm_used, AlgorithmUsed::Ortools);
    }
}
