//! Horizon controller (spec §4.5): wraps the CP-SAT scheduler in an outer
//! loop that grows the planning window until a solution is found or a hard
//! cap is exceeded. Constraints are never relaxed — only the time window
//! grows.

use tracing::{info, instrument, warn};

use super::cpsat::{CpSatOutcome, CpSatScheduler, CpSatStatus};
use crate::config::Config;
use crate::domain::{CalendarSlot, DomainError, DomainModel, Leave, Task};

/// Outcome of the horizon-controlled solve: the best CP-SAT result obtained,
/// the domain model it was obtained against, and the final horizon used.
pub struct HorizonOutcome {
    pub domain_model: DomainModel,
    pub cpsat: CpSatOutcome,
    pub horizon_days: u32,
    /// `true` if the cap was exceeded without finding a solution.
    pub cap_exceeded: bool,
}

/// Wraps [`CpSatScheduler`] in the horizon-extension loop of spec §4.5.
#[derive(Debug, Default, Clone, Copy)]
pub struct HorizonController;

impl HorizonController {
    pub fn new() -> Self {
        Self
    }

    /// Runs the horizon-extension loop over the given input tables,
    /// starting at `config.initial_horizon_days` and growing by
    /// `config.horizon_extension_factor` until a solution is found or
    /// `config.max_horizon_days` is exceeded.
    #[instrument(skip_all, name = "horizon_controller")]
    pub fn solve(
        &self,
        tasks: Vec<Task>,
        calendar_slots: Vec<CalendarSlot>,
        leaves: Vec<Leave>,
        start_date: chrono::NaiveDate,
        config: &Config,
    ) -> Result<HorizonOutcome, DomainError> {
        let scheduler = CpSatScheduler::new();
        let mut horizon_days = config.initial_horizon_days.max(1);

        loop {
            let model = DomainModel::build(
                tasks.clone(),
                calendar_slots.clone(),
                leaves.clone(),
                start_date,
                horizon_days,
            )?;

            let outcome = scheduler.solve(&model, config);
            info!(horizon_days, status = ?outcome.status, "horizon attempt");

            if outcome.status.is_solved() {
                return Ok(HorizonOutcome {
                    domain_model: model,
                    cpsat: outcome,
                    horizon_days,
                    cap_exceeded: false,
                });
            }

            let next_horizon =
                ((horizon_days as f64) * config.horizon_extension_factor).ceil() as u32;

            if next_horizon > config.max_horizon_days || next_horizon <= horizon_days {
                warn!(
                    horizon_days,
                    max = config.max_horizon_days,
                    "horizon cap exceeded without a feasible schedule"
                );
                return Ok(HorizonOutcome {
                    domain_model: model,
                    cpsat: outcome,
                    horizon_days,
                    cap_exceeded: true,
                });
            }

            horizon_days = next_horizon;
        }
    }
}
