//! Schedule and working records.

use std::fmt;

use super::clock::{ClockTime, ScheduledArrival};
use super::day::DaySet;

/// Error returned when parsing an invalid train identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train identifier: {reason}")]
pub struct InvalidTrainId {
    reason: &'static str,
}

/// A train identifier from the master schedule (e.g. "12345").
///
/// Identifiers are non-empty and contain no whitespace; they are embedded
/// verbatim in real-time lookup keys.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TrainId(String);

impl TrainId {
    /// Parse a train identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidTrainId> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidTrainId {
                reason: "must be non-empty",
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidTrainId {
                reason: "must not contain whitespace",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainId({})", self.0)
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A master-schedule row, immutable for the day.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRecord {
    /// Train identifier.
    pub train_id: TrainId,

    /// Display name (e.g. "Rajdhani Express").
    pub name: String,

    /// Train category (e.g. "Express").
    pub category: String,

    /// Origin station name.
    pub origin: String,

    /// Destination station name.
    pub destination: String,

    /// Scheduled arrival time, or undetermined ("TBD").
    pub arrival: ScheduledArrival,

    /// Assigned platform.
    pub platform: String,

    /// Expected passenger count.
    pub passengers: u32,

    /// Priority class.
    pub priority: String,

    /// Weekdays on which the train runs. Never empty for records that
    /// enter the system through a schedule source.
    pub days: DaySet,
}

/// A day-scoped record: a schedule row plus observed real-time data.
///
/// Owned exclusively by the day roster; replaced wholesale when the day
/// rolls over, never patched across days.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingRecord {
    /// The underlying schedule row.
    pub schedule: ScheduleRecord,

    /// Observed arrival time from the real-time provider.
    pub real_arrival: Option<ClockTime>,

    /// Observed delay text from the real-time provider
    /// (e.g. "Delayed by 15 min").
    pub delay: Option<String>,
}

impl WorkingRecord {
    /// A fresh working record with no observed data.
    pub fn fresh(schedule: ScheduleRecord) -> Self {
        Self {
            schedule,
            real_arrival: None,
            delay: None,
        }
    }
}
