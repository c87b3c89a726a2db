//! Domain model & availability index (spec §3, §4.1).
//!
//! Parses tasks, weekly calendar slots, and leave ranges, and builds — for
//! each task — the canonical list of candidate `(date, hour)` slots it may
//! be scheduled into.

mod calendar;
mod error;
mod leave;
mod model;
mod slot;
mod task;

pub use calendar::CalendarSlot;
pub use error::DomainError;
pub use leave::Leave;
pub use model::DomainModel;
pub use slot::{Assignment, SlotUnit};
pub use task::Task;
