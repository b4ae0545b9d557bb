//! The schedule source interface.

use crate::domain::{RunDay, ScheduleRecord};

use super::error::ScheduleError;

/// A queryable master schedule.
///
/// Implementations return the schedule rows for trains running on the
/// given weekday. Rows with an empty weekday set never come back from a
/// source.
pub trait ScheduleSource: Send + Sync {
    /// All schedule records whose run-day set contains `day`.
    fn records_for(&self, day: RunDay) -> Result<Vec<ScheduleRecord>, ScheduleError>;

    /// Cheap reachability check for health reporting.
    fn check(&self) -> Result<(), ScheduleError> {
        Ok(())
    }
}

/// An in-memory schedule, for tests and development without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchedule {
    records: Vec<ScheduleRecord>,
}

impl InMemorySchedule {
    /// Create a schedule holding the given records.
    pub fn new(records: Vec<ScheduleRecord>) -> Self {
        Self { records }
    }
}

impl ScheduleSource for InMemorySchedule {
    fn records_for(&self, day: RunDay) -> Result<Vec<ScheduleRecord>, ScheduleError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.days.contains(day))
            .cloned()
            .collect())
    }
}
