//! The windowed arrivals projection.

use crate::domain::{ClockTime, WorkingRecord};

/// A read-only, status-annotated view of one train.
///
/// Regenerated per request from the working set; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedTrain {
    /// Train identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Train category.
    pub category: String,

    /// Origin station name.
    pub origin: String,

    /// Destination station name.
    pub destination: String,

    /// Scheduled arrival, "HH:MM".
    pub scheduled: String,

    /// Best estimate of arrival: observed if present, else scheduled.
    pub estimated: String,

    /// Status label: "Delayed {delay}" or "On Time".
    pub status: String,

    /// Assigned platform.
    pub platform: String,

    /// Expected passenger count.
    pub passengers: u32,

    /// Priority class.
    pub priority: String,
}

/// Project the records whose scheduled arrival is within `window_mins`
/// of `now`, sorted ascending by scheduled time.
///
/// Records with an undetermined scheduled time are excluded before
/// sorting. Minute arithmetic is same-day: windows do not wrap across
/// midnight, so a train at 00:10 is not within any window of 23:50.
pub fn project_window(
    records: &[WorkingRecord],
    now: ClockTime,
    window_mins: u16,
) -> Vec<ProjectedTrain> {
    let mut projected: Vec<(ClockTime, ProjectedTrain)> = records
        .iter()
        .filter_map(|record| {
            let scheduled = record.schedule.arrival.time()?;
            if scheduled.distance(now) > window_mins {
                return None;
            }
            Some((scheduled, project_record(record, scheduled)))
        })
        .collect();

    projected.sort_by_key(|(scheduled, _)| *scheduled);
    projected.into_iter().map(|(_, train)| train).collect()
}

fn project_record(record: &WorkingRecord, scheduled: ClockTime) -> ProjectedTrain {
    let estimated = record
        .real_arrival
        .map(|t| t.to_string())
        .unwrap_or_else(|| scheduled.to_string());

    let status = match &record.delay {
        Some(delay) => format!("Delayed {delay}"),
        None => "On Time".to_string(),
    };

    ProjectedTrain {
        id: record.schedule.train_id.to_string(),
        name: record.schedule.name.clone(),
        category: record.schedule.category.clone(),
        origin: record.schedule.origin.clone(),
        destination: record.schedule.destination.clone(),
        scheduled: scheduled.to_string(),
        estimated,
        status,
        platform: record.schedule.platform.clone(),
        passengers: record.schedule.passengers,
        priority: record.schedule.priority.clone(),
    }
}
