//! crewplan - hybrid greedy / constraint-programming scheduler.
//!
//! Plans a set of work tasks onto the working hours of their assigned
//! resources, producing an hour-by-hour schedule that respects each
//! resource's weekly working calendar and individual absences.
//!
//! The engine is organized around five collaborating components:
//!
//! - [`domain`] parses tasks, calendar slots, and leaves into a candidate
//!   slot index.
//! - [`algorithms::greedy`] is a priority-ordered constructive scheduler.
//! - [`algorithms::cpsat`] is a constraint-programming scheduler over
//!   Boolean assignment variables.
//! - [`algorithms::hybrid`] routes between the two and merges their results.
//! - [`algorithms::horizon`] re-runs the constraint scheduler with a larger
//!   time window until a feasible solution is found or a cap is reached.
//!
//! [`solution`] assembles the final output document described in the crate's
//! design notes.

pub mod algorithms;
pub mod config;
pub mod domain;
pub mod error;
pub mod request;
pub mod solution;
pub mod telemetry;

pub use config::Config;
pub use error::PlanError;
pub use request::PlanRequest;

/// Identifier type used for tasks and resources.
pub type Id = i64;

/// Generates a unique identifier for a planning run (used in tracing spans
/// and log correlation, never as a domain identity).
pub fn generate_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Runs one full planning call end-to-end: builds the domain model, routes
/// through the hybrid orchestrator, and assembles the output document.
///
/// This is the single entry point external callers (the CLI front door, an
/// embedding application) are expected to use.
#[tracing::instrument(skip_all, name = "plan")]
pub fn plan(
    tasks: Vec<domain::Task>,
    calendar_slots: Vec<domain::CalendarSlot>,
    leaves: Vec<domain::Leave>,
    start_date: chrono::NaiveDate,
    config: &Config,
) -> Result<solution::PlanDocument, PlanError> {
    let outcome =
        algorithms::HybridOrchestrator::new().plan(tasks, calendar_slots, leaves, start_date, config)?;
    Ok(solution::SolutionAssembler::new().assemble(&outcome))
}

/// Convenience wrapper over [`plan`] for callers already holding a parsed
/// [`PlanRequest`]: resolves `start_date` and applies the request's
/// [`request::ConfigOverrides`] on top of `base_config`.
pub fn plan_request(
    request: PlanRequest,
    base_config: &Config,
) -> Result<solution::PlanDocument, PlanError> {
    let start_date = request.resolved_start_date();
    let config = request.overrides.apply(base_config);
    plan(
        request.tasks,
        request.calendar_slots,
        request.leaves,
        start_date,
        &config,
    )
}
