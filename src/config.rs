//! Planning configuration.
//!
//! Everything the engine would otherwise read from scattered globals is
//! threaded explicitly through a single immutable [`Config`] value,
//! constructed once per planning call from environment variables with
//! typed defaults via the `config` crate.

use serde::{Deserialize, Serialize};

/// Immutable configuration for one planning call.
///
/// Field names mirror the environment variables of the same name
/// (lower-cased); see [`Config::from_env`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Absolute cap on the planning horizon, in days (`MAX_HORIZON_DAYS`).
    pub max_horizon_days: u32,
    /// Initial horizon considered before any extension, in days.
    pub initial_horizon_days: u32,
    /// Multiplicative factor applied to the horizon on infeasibility.
    pub horizon_extension_factor: f64,
    /// Wall-clock budget for a full CP-SAT solve (`ORTOOLS_TIME_LIMIT` /
    /// `ORTOOLS_TIMEOUT_SECONDS`; the latter is accepted as an alias).
    pub ortools_time_limit_seconds: f64,
    /// Wall-clock budget for the restricted residual CP-SAT solve in the
    /// hybrid flow (`ORTOOLS_FALLBACK_TIMEOUT`).
    pub ortools_fallback_timeout: f64,
    /// Worker thread count handed to the constraint solver (`ORTOOLS_WORKERS`).
    pub ortools_workers: u32,
    /// Emit solver progress logs via `tracing` (`ORTOOLS_LOG_PROGRESS`).
    pub ortools_log_progress: bool,
    /// Hybrid routing is enabled at all (`HYBRID_MODE`); when `false` the
    /// orchestrator always runs the horizon-controlled CP-SAT scheduler.
    pub hybrid_mode: bool,
    /// Task-count threshold above which the orchestrator routes to greedy.
    pub greedy_threshold_tasks: usize,
    /// Total remaining-hours threshold above which the orchestrator routes
    /// to greedy.
    pub greedy_threshold_hours: u64,
    /// Distinct-resource-count threshold above which the orchestrator
    /// routes to greedy.
    pub greedy_threshold_users: usize,
    /// Average hours-per-task threshold above which the orchestrator routes
    /// to greedy.
    pub greedy_threshold_avg_hours: f64,
    /// Maximum residual task count for which the hybrid flow still attempts
    /// a restricted CP-SAT cleanup pass after greedy.
    pub hybrid_residual_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_horizon_days: 1825,
            initial_horizon_days: 28,
            horizon_extension_factor: 1.25,
            ortools_time_limit_seconds: 30.0,
            ortools_fallback_timeout: 10.0,
            ortools_workers: 4,
            ortools_log_progress: false,
            hybrid_mode: true,
            greedy_threshold_tasks: 50,
            greedy_threshold_hours: 1000,
            greedy_threshold_users: 10,
            greedy_threshold_avg_hours: 100.0,
            hybrid_residual_cap: 20,
        }
    }
}

impl Config {
    /// Builds a `Config` from environment variables, falling back to the
    /// defaults above for anything unset. `ORTOOLS_TIMEOUT_SECONDS` is
    /// accepted as an alias for `ortools_time_limit_seconds` when
    /// `ORTOOLS_TIME_LIMIT` itself is absent.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("max_horizon_days", defaults.max_horizon_days)?
            .set_default("initial_horizon_days", defaults.initial_horizon_days)?
            .set_default(
                "horizon_extension_factor",
                defaults.horizon_extension_factor,
            )?
            .set_default(
                "ortools_time_limit_seconds",
                defaults.ortools_time_limit_seconds,
            )?
            .set_default(
                "ortools_fallback_timeout",
                defaults.ortools_fallback_timeout,
            )?
            .set_default("ortools_workers", defaults.ortools_workers)?
            .set_default("ortools_log_progress", defaults.ortools_log_progress)?
            .set_default("hybrid_mode", defaults.hybrid_mode)?
            .set_default("greedy_threshold_tasks", defaults.greedy_threshold_tasks as i64)?
            .set_default("greedy_threshold_hours", defaults.greedy_threshold_hours as i64)?
            .set_default("greedy_threshold_users", defaults.greedy_threshold_users as i64)?
            .set_default(
                "greedy_threshold_avg_hours",
                defaults.greedy_threshold_avg_hours,
            )?
            .set_default("hybrid_residual_cap", defaults.hybrid_residual_cap as i64)?;

        // ORTOOLS_TIME_LIMIT is the canonical name; accept the legacy
        // ORTOOLS_TIMEOUT_SECONDS spelling when the canonical one is unset.
        if std::env::var("ORTOOLS_TIME_LIMIT").is_err() {
            if let Ok(v) = std::env::var("ORTOOLS_TIMEOUT_SECONDS") {
                builder = builder.set_override("ortools_time_limit_seconds", v)?;
            }
        }

        let raw = builder
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        raw.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = Config::default();
        assert_eq!(cfg.max_horizon_days, 1825);
        assert_eq!(cfg.initial_horizon_days, 28);
        assert_eq!(cfg.ortools_workers, 4);
        assert!(cfg.hybrid_mode);
        assert_eq!(cfg.hybrid_residual_cap, 20);
    }

    #[test]
    fn from_env_falls_back_to_defaults_when_unset() {
        // No environment variables are set in this process by default;
        // the builder must not error and must match Config::default().
        let cfg = Config::from_env().expect("config should build from defaults alone");
        assert_eq!(cfg, Config::default());
    }
}
