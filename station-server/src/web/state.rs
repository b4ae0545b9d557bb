//! Application state for the web layer.

use std::sync::Arc;

use crate::board::TodayBoard;
use crate::realtime::CachedRealtimeClient;
use crate::refresh::Refresher;
use crate::schedule::ScheduleSource;
use crate::weather::WeatherService;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Today's working set of trains.
    pub board: Arc<TodayBoard>,

    /// Cached real-time lookup client.
    pub realtime: Arc<CachedRealtimeClient>,

    /// Cached weather service.
    pub weather: Arc<WeatherService>,

    /// Refresh driver (shared with the background loop so on-demand
    /// refreshes and timer cycles never overlap).
    pub refresher: Arc<Refresher>,

    /// Master schedule source, for health reporting.
    pub schedule: Arc<dyn ScheduleSource>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        board: Arc<TodayBoard>,
        realtime: Arc<CachedRealtimeClient>,
        weather: Arc<WeatherService>,
        refresher: Arc<Refresher>,
        schedule: Arc<dyn ScheduleSource>,
    ) -> Self {
        Self {
            board,
            realtime,
            weather,
            refresher,
            schedule,
        }
    }
}
