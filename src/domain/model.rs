//! The availability index (spec §4.1): for every task, the canonical,
//! chronologically sorted list of candidate `(date, hour)` slots inside
//! `[start_date, start_date + horizon_days)`.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, instrument};

use super::calendar::CalendarSlot;
use super::error::DomainError;
use super::leave::Leave;
use super::slot::SlotUnit;
use super::task::Task;
use crate::Id;

/// Read-only, per-call domain model: validated tasks plus their candidate
/// slot index and the reverse resource-hour index.
///
/// Built once per planning call (or once per horizon attempt, by the
/// horizon controller) and borrowed read-only by every scheduler.
#[derive(Debug, Clone)]
pub struct DomainModel {
    start_date: NaiveDate,
    horizon_days: u32,
    tasks: HashMap<Id, Task>,
    /// `C(t)`: candidate slot units per task, sorted by `(date, hour)`.
    candidates: HashMap<Id, Vec<SlotUnit>>,
    /// `R(resource, date, hour)`: all tasks competing for a resource-hour.
    resource_index: HashMap<(Id, NaiveDate, u8), Vec<Id>>,
    /// Tasks with `remaining_hours > 0` but an empty candidate list —
    /// structurally infeasible at this horizon (spec §4.1).
    infeasible_tasks: Vec<Id>,
}

impl DomainModel {
    /// Validates the three input tables and builds the candidate index for
    /// `[start_date, start_date + horizon_days)`.
    #[instrument(skip_all, fields(tasks = tasks.len(), calendar_slots = calendar_slots.len(), leaves = leaves.len(), horizon_days))]
    pub fn build(
        tasks: Vec<Task>,
        calendar_slots: Vec<CalendarSlot>,
        leaves: Vec<Leave>,
        start_date: NaiveDate,
        horizon_days: u32,
    ) -> Result<Self, DomainError> {
        if horizon_days == 0 {
            return Err(DomainError::InvalidHorizon(horizon_days));
        }
        for t in &tasks {
            t.validate()?;
        }
        for c in &calendar_slots {
            c.validate()?;
        }
        for l in &leaves {
            l.validate()?;
        }

        let mut calendar_by_task: HashMap<Id, Vec<CalendarSlot>> = HashMap::new();
        for c in calendar_slots {
            calendar_by_task.entry(c.task_id).or_default().push(c);
        }
        let mut leaves_by_task: HashMap<Id, Vec<Leave>> = HashMap::new();
        for l in leaves {
            leaves_by_task.entry(l.task_id).or_default().push(l);
        }

        let mut task_map = HashMap::new();
        let mut candidates = HashMap::new();
        let mut resource_index: HashMap<(Id, NaiveDate, u8), Vec<Id>> = HashMap::new();
        let mut infeasible_tasks = Vec::new();

        for task in tasks {
            // Tasks with remaining_hours == 0 are dropped before scheduling.
            if task.remaining_hours == 0 {
                continue;
            }

            let task_id = task.task_id;
            let resource_id = task.resource_id;
            let slots = calendar_by_task.get(&task_id).map(Vec::as_slice).unwrap_or(&[]);
            let task_leaves = leaves_by_task.get(&task_id).map(Vec::as_slice).unwrap_or(&[]);

            let c_t = Self::candidate_slots(task_id, slots, task_leaves, start_date, horizon_days);

            if c_t.is_empty() {
                debug!(task_id, "structurally infeasible at this horizon");
                infeasible_tasks.push(task_id);
            }

            for unit in &c_t {
                resource_index
                    .entry((resource_id, unit.date, unit.hour))
                    .or_default()
                    .push(task_id);
            }

            candidates.insert(task_id, c_t);
            task_map.insert(task_id, task);
        }

        Ok(Self {
            start_date,
            horizon_days,
            tasks: task_map,
            candidates,
            resource_index,
            infeasible_tasks,
        })
    }

    /// Builds the candidate slot list for one task: iterate each date in the
    /// horizon, skip leave-covered dates, emit every hour of every calendar
    /// slot matching that weekday, deduplicating overlapping windows.
    fn candidate_slots(
        task_id: Id,
        slots: &[CalendarSlot],
        leaves: &[Leave],
        start_date: NaiveDate,
        horizon_days: u32,
    ) -> Vec<SlotUnit> {
        let mut out = Vec::new();
        for offset in 0..horizon_days as i64 {
            let date = start_date + Duration::days(offset);
            if leaves.iter().any(|l| l.covers(date)) {
                continue;
            }
            let weekday = date.weekday().num_days_from_monday() as u8;
            let mut hours: BTreeSet<u8> = BTreeSet::new();
            for slot in slots.iter().filter(|s| s.dayofweek == weekday) {
                hours.extend(slot.hours());
            }
            out.extend(hours.into_iter().map(|hour| SlotUnit::new(task_id, date, hour)));
        }
        out
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    pub fn task(&self, task_id: Id) -> Option<&Task> {
        self.tasks.get(&task_id)
    }

    /// Tasks that survived the `remaining_hours == 0` filter, in no
    /// particular order. Use [`DomainModel::schedulable_tasks`] for the
    /// subset that also has at least one candidate slot.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Tasks with at least one candidate slot (i.e. not structurally
    /// infeasible at this horizon).
    pub fn schedulable_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks
            .values()
            .filter(move |t| !self.infeasible_tasks.contains(&t.task_id))
    }

    pub fn candidates(&self, task_id: Id) -> &[SlotUnit] {
        self.candidates.get(&task_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All tasks competing for a given resource-hour.
    pub fn competitors(&self, resource_id: Id, date: NaiveDate, hour: u8) -> &[Id] {
        self.resource_index
            .get(&(resource_id, date, hour))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Tasks with an empty candidate list — structurally infeasible at this
    /// horizon (spec §4.1). Excluded from solving, never fatal to the run.
    pub fn infeasible_tasks(&self) -> &[Id] {
        &self.infeasible_tasks
    }

    /// All distinct resource ids among schedulable tasks.
    pub fn resource_count(&self) -> usize {
        self.schedulable_tasks()
            .map(|t| t.resource_id)
            .collect::<std::collections::HashSet<_>>()
            .len()
    }

    /// Total remaining hours across schedulable tasks.
    pub fn total_remaining_hours(&self) -> u64 {
        self.schedulable_tasks().map(|t| t.remaining_hours as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(id: Id, resource_id: Id, hours: u32) -> Task {
        Task {
            task_id: id,
            name: format!("task-{id}"),
            resource_id,
            remaining_hours: hours,
            priority_score: 50.0,
        }
    }

    fn weekday_slot(task_id: Id, dayofweek: u8, hour_from: u8, hour_to: u8) -> CalendarSlot {
        CalendarSlot {
            task_id,
            dayofweek,
            hour_from,
            hour_to,
        }
    }

    #[test]
    fn candidate_index_excludes_non_matching_weekdays() {
        // Monday 2026-02-02: weekday() Monday -> num_days_from_monday() == 0.
        let model = DomainModel::build(
            vec![task(1, 1, 3)],
            vec![weekday_slot(1, 0, 9, 12)], // Monday only
            vec![],
            d("2026-02-02"),
            7,
        )
        .unwrap();

        let c = model.candidates(1);
        assert_eq!(c.len(), 3);
        assert!(c.iter().all(|s| s.date == d("2026-02-02")));
    }

    #[test]
    fn leave_excludes_the_covered_date() {
        let model = DomainModel::build(
            vec![task(1, 1, 3)],
            vec![
                weekday_slot(1, 0, 9, 12), // Monday
                weekday_slot(1, 1, 9, 12), // Tuesday
            ],
            vec![Leave {
                task_id: 1,
                date_from: d("2026-02-02"),
                date_to: d("2026-02-02"),
            }],
            d("2026-02-02"),
            7,
        )
        .unwrap();

        let c = model.candidates(1);
        assert!(c.iter().all(|s| s.date != d("2026-02-02")));
        assert!(c.iter().any(|s| s.date == d("2026-02-03")));
    }

    #[test]
    fn zero_remaining_hours_task_is_dropped() {
        let model = DomainModel::build(
            vec![task(1, 1, 0)],
            vec![weekday_slot(1, 0, 9, 17)],
            vec![],
            d("2026-02-02"),
            7,
        )
        .unwrap();
        assert!(model.task(1).is_none());
        assert!(model.candidates(1).is_empty());
    }

    #[test]
    fn task_with_no_calendar_slot_is_structurally_infeasible() {
        let model =
            DomainModel::build(vec![task(1, 1, 3)], vec![], vec![], d("2026-02-02"), 7).unwrap();
        assert_eq!(model.infeasible_tasks(), &[1]);
        assert!(model.candidates(1).is_empty());
    }

    #[test]
    fn overlapping_windows_are_deduplicated() {
        let model = DomainModel::build(
            vec![task(1, 1, 10)],
            vec![
                weekday_slot(1, 0, 9, 13),
                weekday_slot(1, 0, 11, 17), // overlaps [11,13)
            ],
            vec![],
            d("2026-02-02"),
            1,
        )
        .unwrap();
        let hours: Vec<u8> = model.candidates(1).iter().map(|s| s.hour).collect();
        assert_eq!(hours, vec![9, 10, 11, 12, 13, 14, 15, 16]);
    }

    #[test]
    fn candidates_are_sorted_by_date_then_hour() {
        let model = DomainModel::build(
            vec![task(1, 1, 20)],
            vec![weekday_slot(1, 0, 9, 12), weekday_slot(1, 1, 9, 12)],
            vec![],
            d("2026-02-02"),
            14,
        )
        .unwrap();
        let c = model.candidates(1);
        for w in c.windows(2) {
            assert!((w[0].date, w[0].hour) <= (w[1].date, w[1].hour));
        }
    }

    #[test]
    fn resource_index_tracks_competitors() {
        let model = DomainModel::build(
            vec![task(1, 1, 2), task(2, 1, 2)],
            vec![weekday_slot(1, 0, 9, 11), weekday_slot(2, 0, 9, 11)],
            vec![],
            d("2026-02-02"),
            1,
        )
        .unwrap();
        let competitors = model.competitors(1, d("2026-02-02"), 9);
        assert_eq!(competitors.len(), 2);
    }

    #[test]
    fn rejects_invalid_input_before_building_any_index() {
        let bad_task = Task {
            task_id: 1,
            name: "t".into(),
            resource_id: 1,
            remaining_hours: 5,
            priority_score: 500.0,
        };
        let err = DomainModel::build(vec![bad_task], vec![], vec![], d("2026-02-02"), 7);
        assert!(err.is_err());
    }
}
