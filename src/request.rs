//! Input boundary types for one planning call (spec §6).
//!
//! A request carries the three input tables plus the subset of [`Config`]
//! fields the external interface allows a caller to override per call;
//! anything left unset falls back to [`Config::from_env`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{CalendarSlot, Leave, Task};
use crate::Config;

/// One planning call's input (spec §6 "Invocation inputs").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub calendar_slots: Vec<CalendarSlot>,
    #[serde(default)]
    pub leaves: Vec<Leave>,
    /// Defaults to today when absent (spec §6).
    pub start_date: Option<NaiveDate>,
    #[serde(default, flatten)]
    pub overrides: ConfigOverrides,
}

/// Per-call overrides for the subset of [`Config`] the invocation
/// parameters expose (spec §6). Every field is optional; unset fields keep
/// whatever base [`Config`] they are applied on top of.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
    pub initial_horizon_days: Option<u32>,
    pub horizon_extension_factor: Option<f64>,
    pub max_horizon_days: Option<u32>,
    pub ortools_time_limit_seconds: Option<f64>,
    pub ortools_workers: Option<u32>,
    pub hybrid_mode: Option<bool>,
    pub greedy_threshold_tasks: Option<usize>,
    pub greedy_threshold_hours: Option<u64>,
    pub greedy_threshold_users: Option<usize>,
    pub greedy_threshold_avg_hours: Option<f64>,
}

impl ConfigOverrides {
    /// Applies these overrides on top of `base`, returning a new `Config`.
    pub fn apply(&self, base: &Config) -> Config {
        let mut cfg = base.clone();
        if let Some(v) = self.initial_horizon_days {
            cfg.initial_horizon_days = v;
        }
        if let Some(v) = self.horizon_extension_factor {
            cfg.horizon_extension_factor = v;
        }
        if let Some(v) = self.max_horizon_days {
            cfg.max_horizon_days = v;
        }
        if let Some(v) = self.ortools_time_limit_seconds {
            cfg.ortools_time_limit_seconds = v;
        }
        if let Some(v) = self.ortools_workers {
            cfg.ortools_workers = v;
        }
        if let Some(v) = self.hybrid_mode {
            cfg.hybrid_mode = v;
        }
        if let Some(v) = self.greedy_threshold_tasks {
            cfg.greedy_threshold_tasks = v;
        }
        if let Some(v) = self.greedy_threshold_hours {
            cfg.greedy_threshold_hours = v;
        }
        if let Some(v) = self.greedy_threshold_users {
            cfg.greedy_threshold_users = v;
        }
        if let Some(v) = self.greedy_threshold_avg_hours {
            cfg.greedy_threshold_avg_hours = v;
        }
        cfg
    }
}

impl PlanRequest {
    /// Resolves this request's `start_date`, defaulting to today in UTC.
    pub fn resolved_start_date(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}
