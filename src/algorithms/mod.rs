//! Scheduling algorithms (spec §4.2–§4.5): the greedy constructive
//! scheduler, the CP-SAT-style constraint scheduler, the horizon controller
//! that wraps it, and the hybrid orchestrator that routes between them.

pub mod cpsat;
pub mod greedy;
pub mod horizon;
pub mod hybrid;

pub use cpsat::{CpSatOutcome, CpSatScheduler, CpSatStatus};
pub use greedy::{GreedyOutcome, GreedyScheduler};
pub use horizon::HorizonController;
pub use hybrid::{AlgorithmUsed, HybridOrchestrator, PlanOutcome};
