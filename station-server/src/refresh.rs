//! Periodic refresh of the working set.
//!
//! A repeating timer drives each cycle: check for a day rollover, pick
//! the trains arriving inside the lookup horizon, fan out real-time
//! lookups, and merge the results. Cycles never overlap — if one is
//! still in flight when the timer fires (or an on-demand refresh
//! arrives), the new cycle is skipped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::board::TodayBoard;
use crate::domain::ClockTime;
use crate::realtime::CachedRealtimeClient;

/// Configuration for the refresh loop.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// How often a cycle runs.
    pub period: Duration,

    /// Forward-looking lookup horizon in minutes: trains scheduled
    /// within this many minutes from now get a real-time lookup.
    pub horizon_mins: u16,
}

impl RefreshConfig {
    /// Set the cycle period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Set the lookup horizon.
    pub fn with_horizon_mins(mut self, mins: u16) -> Self {
        self.horizon_mins = mins;
        self
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(5 * 60),
            horizon_mins: 30,
        }
    }
}

/// What one refresh cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Whether a day rollover rebuilt the working set.
    pub rebuilt: bool,

    /// How many trains were inside the lookup horizon.
    pub candidates: usize,

    /// How many working records received observed data.
    pub applied: usize,
}

/// Drives day-change checks and near-term enrichment.
pub struct Refresher {
    board: Arc<TodayBoard>,
    realtime: Arc<CachedRealtimeClient>,
    config: RefreshConfig,
    in_flight: Semaphore,
}

impl Refresher {
    /// Create a refresher over the given board and lookup client.
    pub fn new(
        board: Arc<TodayBoard>,
        realtime: Arc<CachedRealtimeClient>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            board,
            realtime,
            config,
            in_flight: Semaphore::new(1),
        }
    }

    /// Run the refresh loop forever. Spawn this as a background task.
    pub async fn run(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.config.period);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match self.try_cycle().await {
                Some(outcome) => tracing::info!(
                    rebuilt = outcome.rebuilt,
                    candidates = outcome.candidates,
                    applied = outcome.applied,
                    "refresh cycle complete"
                ),
                None => tracing::info!("refresh cycle still in flight, skipped"),
            }
        }
    }

    /// Run one cycle now unless another is already in flight.
    ///
    /// Returns `None` when skipped. Shared by the timer loop and the
    /// on-demand refresh endpoint, so the two can never overlap.
    pub async fn try_cycle(&self) -> Option<CycleOutcome> {
        self.try_cycle_at(ClockTime::now()).await
    }

    /// Like [`Self::try_cycle`], relative to an explicit "now".
    pub async fn try_cycle_at(&self, now: ClockTime) -> Option<CycleOutcome> {
        let Ok(_permit) = self.in_flight.try_acquire() else {
            return None;
        };
        Some(self.cycle(now).await)
    }

    async fn cycle(&self, now: ClockTime) -> CycleOutcome {
        let rebuilt = match self.board.check_day_change().await {
            Ok(rebuilt) => rebuilt,
            Err(e) => {
                // Fail-stale: keep serving the previous working set and
                // retry the rollover on the next cycle.
                tracing::warn!(error = %e, "day rollover rebuild failed");
                false
            }
        };

        let candidates = self.board.candidates(now, self.config.horizon_mins).await;
        let results = self.realtime.fetch_many(&candidates).await;
        let applied = self
            .board
            .apply_enrichment(results.iter().map(|r| r.as_ref()))
            .await;

        CycleOutcome {
            rebuilt,
            candidates: candidates.len(),
            applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DaySet, RunDay, ScheduleRecord, ScheduledArrival, TrainId};
    use crate::provider::ProviderCommand;
    use crate::realtime::{RealtimeCacheConfig, RealtimeClient, RealtimeConfig};
    use crate::schedule::InMemorySchedule;

    fn record(id: &str, arrives: &str) -> ScheduleRecord {
        ScheduleRecord {
            train_id: TrainId::parse(id).unwrap(),
            name: format!("Train {id}"),
            category: "Express".into(),
            origin: "A".into(),
            destination: "B".into(),
            arrival: ScheduledArrival::parse(arrives),
            platform: "1".into(),
            passengers: 100,
            priority: "Normal".into(),
            days: DaySet::all(),
        }
    }

    fn refresher(records: Vec<ScheduleRecord>, script: &str) -> Arc<Refresher> {
        // Built for the actual current day so the in-cycle day-change
        // check is a no-op.
        let board = Arc::new(
            TodayBoard::build_for(
                Arc::new(InMemorySchedule::new(records)),
                RunDay::today(),
            )
            .unwrap(),
        );
        let command = ProviderCommand::new("sh")
            .with_arg("-c")
            .with_arg(script)
            .with_arg("sh");
        let realtime = Arc::new(CachedRealtimeClient::new(
            RealtimeClient::new(RealtimeConfig::new(command)),
            &RealtimeCacheConfig::default(),
        ));
        Arc::new(Refresher::new(board, realtime, RefreshConfig::default()))
    }

    #[tokio::test]
    async fn cycle_enriches_trains_in_horizon() {
        let refresher = refresher(
            vec![
                record("100", "14:10"),
                record("200", "16:00"),
                record("300", "13:55"),
            ],
            "printf \"{'real_arrival': '14:20', 'delay': 'by 10 min'}\"",
        );

        let now = ClockTime::parse_hhmm("14:00").unwrap();
        let outcome = refresher.try_cycle_at(now).await.unwrap();

        assert!(!outcome.rebuilt);
        assert_eq!(outcome.candidates, 1);
        assert_eq!(outcome.applied, 1);

        let updated = refresher
            .board
            .find(&TrainId::parse("100").unwrap())
            .await
            .unwrap();
        assert_eq!(updated.delay.as_deref(), Some("by 10 min"));
    }

    #[tokio::test]
    async fn cycle_with_failing_provider_applies_nothing() {
        let refresher = refresher(vec![record("100", "14:10")], "exit 1");

        let now = ClockTime::parse_hhmm("14:00").unwrap();
        let outcome = refresher.try_cycle_at(now).await.unwrap();

        assert_eq!(outcome.candidates, 1);
        assert_eq!(outcome.applied, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_cycles_do_not_overlap() {
        // A provider slow enough that the first cycle is still in
        // flight when the second is attempted.
        let refresher = refresher(
            vec![record("100", "14:10")],
            "sleep 0.5; printf \"{'delay': 'by 2 min'}\"",
        );

        let now = ClockTime::parse_hhmm("14:00").unwrap();
        let first = {
            let refresher = refresher.clone();
            tokio::spawn(async move { refresher.try_cycle_at(now).await })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(refresher.try_cycle_at(now).await.is_none());

        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome.applied, 1);

        // Once the first cycle finishes, cycles run again.
        assert!(refresher.try_cycle_at(now).await.is_some());
    }
}
