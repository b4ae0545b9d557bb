//! The day roster: today's working set of trains.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{ClockTime, RunDay, TrainId, WorkingRecord};
use crate::realtime::EnrichmentResult;
use crate::schedule::{ScheduleError, ScheduleSource};

use super::project::{ProjectedTrain, project_window};

/// The working set for one calendar day.
struct Roster {
    day: RunDay,
    records: Vec<WorkingRecord>,
}

/// Owner of the day-scoped working set.
///
/// The roster is derived from the master schedule for the current
/// weekday and replaced wholesale when the day rolls over. Rebuilds are
/// build-then-swap: the new record list is constructed outside the lock
/// and installed in a single assignment, so readers always see either
/// the old or the new complete set.
///
/// On rebuild failure the previous roster is retained and keeps being
/// served (fail-stale, never fail-empty).
pub struct TodayBoard {
    source: Arc<dyn ScheduleSource>,
    inner: RwLock<Roster>,
}

impl TodayBoard {
    /// Build the initial roster for the current weekday.
    ///
    /// Fails if the master schedule is unreachable — at startup there is
    /// no previous set to fall back on.
    pub fn build(source: Arc<dyn ScheduleSource>) -> Result<Self, ScheduleError> {
        Self::build_for(source, RunDay::today())
    }

    /// Build the initial roster for a specific weekday.
    pub fn build_for(source: Arc<dyn ScheduleSource>, day: RunDay) -> Result<Self, ScheduleError> {
        let records = fetch_records(source.as_ref(), day)?;
        Ok(Self {
            source,
            inner: RwLock::new(Roster { day, records }),
        })
    }

    /// Rebuild the roster for the current weekday.
    ///
    /// Returns the number of trains in the new working set. Safe to call
    /// at any time: concurrent readers see the old set until the swap.
    pub async fn rebuild(&self) -> Result<usize, ScheduleError> {
        self.rebuild_for(RunDay::today()).await
    }

    /// Rebuild the roster for a specific weekday.
    pub async fn rebuild_for(&self, day: RunDay) -> Result<usize, ScheduleError> {
        // Build outside the lock; swap in one assignment.
        let records = fetch_records(self.source.as_ref(), day)?;
        let count = records.len();

        let mut guard = self.inner.write().await;
        *guard = Roster { day, records };

        tracing::info!(day = %day, trains = count, "working set rebuilt");
        Ok(count)
    }

    /// Rebuild if the calendar day has changed since the roster was built.
    ///
    /// Returns whether a rebuild happened. Checks within the same day are
    /// no-ops, so the caller can run this on every tick. If the rebuild
    /// fails the stale roster is kept and the next check retries.
    pub async fn check_day_change(&self) -> Result<bool, ScheduleError> {
        self.check_day_change_to(RunDay::today()).await
    }

    /// Day-change check against an explicit "today".
    pub async fn check_day_change_to(&self, today: RunDay) -> Result<bool, ScheduleError> {
        {
            let guard = self.inner.read().await;
            if guard.day == today {
                return Ok(false);
            }
        }
        self.rebuild_for(today).await?;
        Ok(true)
    }

    /// The weekday the roster was built for.
    pub async fn day(&self) -> RunDay {
        self.inner.read().await.day
    }

    /// Number of trains in today's working set.
    pub async fn active_count(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// A snapshot of the raw working records.
    pub async fn records(&self) -> Vec<WorkingRecord> {
        self.inner.read().await.records.clone()
    }

    /// Look up one working record by train identifier.
    pub async fn find(&self, id: &TrainId) -> Option<WorkingRecord> {
        let guard = self.inner.read().await;
        guard
            .records
            .iter()
            .find(|r| &r.schedule.train_id == id)
            .cloned()
    }

    /// Trains with a scheduled arrival in `(now, now + horizon_mins]`,
    /// as lookup candidates (identifier and display name).
    ///
    /// Same-day arithmetic: the horizon does not wrap past midnight.
    pub async fn candidates(&self, now: ClockTime, horizon_mins: u16) -> Vec<(TrainId, String)> {
        let limit = now.minutes().saturating_add(horizon_mins);
        let guard = self.inner.read().await;
        guard
            .records
            .iter()
            .filter_map(|r| {
                let scheduled = r.schedule.arrival.time()?;
                let m = scheduled.minutes();
                (m > now.minutes() && m <= limit)
                    .then(|| (r.schedule.train_id.clone(), r.schedule.name.clone()))
            })
            .collect()
    }

    /// Merge enrichment results into the working set by train identifier.
    ///
    /// Only results carrying observed data have any effect; no-data and
    /// failed results are skipped silently, as are identifiers not in
    /// today's set. Returns the number of records updated. Applying the
    /// same result twice is a no-op the second time.
    pub async fn apply_enrichment<'a, I>(&self, results: I) -> usize
    where
        I: IntoIterator<Item = &'a EnrichmentResult>,
    {
        let mut guard = self.inner.write().await;
        let mut applied = 0;

        for result in results {
            let Some(observation) = result.observed() else {
                continue;
            };
            let Some(record) = guard
                .records
                .iter_mut()
                .find(|r| r.schedule.train_id == result.train_id)
            else {
                continue;
            };

            record.real_arrival = observation.real_arrival;
            record.delay = observation.delay.clone();
            applied += 1;
        }

        applied
    }

    /// Project the working set onto a time window around `now`.
    pub async fn project(&self, now: ClockTime, window_mins: u16) -> Vec<ProjectedTrain> {
        let guard = self.inner.read().await;
        project_window(&guard.records, now, window_mins)
    }
}

/// Fetch and wrap the schedule rows for a day.
fn fetch_records(
    source: &dyn ScheduleSource,
    day: RunDay,
) -> Result<Vec<WorkingRecord>, ScheduleError> {
    let records = source.records_for(day)?;
    Ok(records.into_iter().map(WorkingRecord::fresh).collect())
}
