//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::board::ProjectedTrain;
use crate::domain::WorkingRecord;
use crate::refresh::CycleOutcome;
use crate::weather::WeatherView;

/// Health report.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "ok" or "degraded".
    pub status: &'static str,

    /// Schedule source status: "ok" or the error message.
    pub schedule: String,
}

/// Active train count for today.
#[derive(Debug, Serialize)]
pub struct ActiveResponse {
    /// Number of trains in today's working set.
    pub count: usize,
}

/// Query parameters for the windowed train listing.
#[derive(Debug, Deserialize)]
pub struct TrainsQuery {
    /// Window half-width in minutes (defaults to 120).
    pub window: Option<u16>,
}

/// A raw working record, as stored for today.
#[derive(Debug, Serialize)]
pub struct WorkingRecordDto {
    pub train_number: String,
    pub train_name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub from_station: String,
    pub to_station: String,
    pub arrives: String,
    pub allocated_platform: String,
    pub passengers: u32,
    pub priority: String,
    pub days: String,
    pub real_arrival: Option<String>,
    pub delay: Option<String>,
}

impl WorkingRecordDto {
    /// Create from a working record.
    pub fn from_record(record: &WorkingRecord) -> Self {
        Self {
            train_number: record.schedule.train_id.to_string(),
            train_name: record.schedule.name.clone(),
            category: record.schedule.category.clone(),
            from_station: record.schedule.origin.clone(),
            to_station: record.schedule.destination.clone(),
            arrives: record.schedule.arrival.to_string(),
            allocated_platform: record.schedule.platform.clone(),
            passengers: record.schedule.passengers,
            priority: record.schedule.priority.clone(),
            days: record.schedule.days.to_string(),
            real_arrival: record.real_arrival.map(|t| t.to_string()),
            delay: record.delay.clone(),
        }
    }
}

/// Response for today's raw records.
#[derive(Debug, Serialize)]
pub struct TodayResponse {
    /// The weekday the working set was built for.
    pub day: String,

    /// Today's records.
    pub rows: Vec<WorkingRecordDto>,
}

/// A projected train for display.
#[derive(Debug, Serialize)]
pub struct ProjectedTrainDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub from: String,
    pub to: String,
    pub scheduled: String,
    pub estimated: String,
    pub status: String,
    pub platform: String,
    pub passengers: u32,
    pub priority: String,
}

impl ProjectedTrainDto {
    /// Create from a projection entry.
    pub fn from_projected(train: &ProjectedTrain) -> Self {
        Self {
            id: train.id.clone(),
            name: train.name.clone(),
            category: train.category.clone(),
            from: train.origin.clone(),
            to: train.destination.clone(),
            scheduled: train.scheduled.clone(),
            estimated: train.estimated.clone(),
            status: train.status.clone(),
            platform: train.platform.clone(),
            passengers: train.passengers,
            priority: train.priority.clone(),
        }
    }
}

/// Response for the windowed train listing.
#[derive(Debug, Serialize)]
pub struct TrainsResponse {
    /// Trains inside the window, soonest first.
    pub trains: Vec<ProjectedTrainDto>,
}

/// Response for the cached weather.
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
    pub condition: String,

    /// When the reading was fetched (RFC 3339).
    pub fetched_at: String,

    /// Whether the reading outlived its TTL because the provider is
    /// currently failing.
    pub stale: bool,
}

impl WeatherResponse {
    /// Create from a served weather view.
    pub fn from_view(view: &WeatherView) -> Self {
        Self {
            temperature: view.snapshot.reading.temperature,
            humidity: view.snapshot.reading.humidity,
            precipitation: view.snapshot.reading.precipitation,
            condition: view
                .snapshot
                .reading
                .condition
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            fetched_at: view.snapshot.fetched_at.to_rfc3339(),
            stale: view.stale,
        }
    }
}

/// Response for an on-demand refresh of all near-term trains.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Whether a cycle ran (false when one was already in flight).
    pub refreshed: bool,

    /// Whether the cycle rebuilt the working set for a new day.
    pub rebuilt: bool,

    /// Trains inside the lookup horizon.
    pub candidates: usize,

    /// Records that received observed data.
    pub updated: usize,
}

impl RefreshResponse {
    /// Create from a cycle outcome, or the skipped marker.
    pub fn from_outcome(outcome: Option<CycleOutcome>) -> Self {
        match outcome {
            Some(o) => Self {
                refreshed: true,
                rebuilt: o.rebuilt,
                candidates: o.candidates,
                updated: o.applied,
            },
            None => Self {
                refreshed: false,
                rebuilt: false,
                candidates: 0,
                updated: 0,
            },
        }
    }
}

/// Response for an on-demand refresh of a single train.
#[derive(Debug, Serialize)]
pub struct TrainRefreshResponse {
    /// The train that was looked up.
    pub id: String,

    /// Whether the lookup produced observed data that was applied.
    pub updated: bool,

    /// Observed arrival, if any.
    pub real_arrival: Option<String>,

    /// Observed delay, if any.
    pub delay: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockTime, DaySet, ScheduleRecord, ScheduledArrival, TrainId};
    use crate::weather::{WeatherReading, WeatherSnapshot};
    use chrono::Utc;

    fn working_record() -> WorkingRecord {
        let mut record = WorkingRecord::fresh(ScheduleRecord {
            train_id: TrainId::parse("12345").unwrap(),
            name: "Rajdhani Express".into(),
            category: "Express".into(),
            origin: "New Delhi".into(),
            destination: "Mumbai".into(),
            arrival: ScheduledArrival::parse("14:30"),
            platform: "1".into(),
            passengers: 450,
            priority: "High".into(),
            days: DaySet::parse("Sun,Mon"),
        });
        record.real_arrival = ClockTime::parse_hhmm("14:45").ok();
        record.delay = Some("by 15 min".into());
        record
    }

    #[test]
    fn working_record_dto_fields() {
        let dto = WorkingRecordDto::from_record(&working_record());
        assert_eq!(dto.train_number, "12345");
        assert_eq!(dto.train_name, "Rajdhani Express");
        assert_eq!(dto.arrives, "14:30");
        assert_eq!(dto.days, "Sun,Mon");
        assert_eq!(dto.real_arrival.as_deref(), Some("14:45"));
        assert_eq!(dto.delay.as_deref(), Some("by 15 min"));
    }

    #[test]
    fn working_record_dto_serialises_category_as_type() {
        let dto = WorkingRecordDto::from_record(&working_record());
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "Express");
        assert!(json.get("category").is_none());
    }

    #[test]
    fn weather_response_defaults_condition() {
        let view = WeatherView {
            snapshot: WeatherSnapshot {
                reading: WeatherReading {
                    temperature: Some(24.3),
                    humidity: None,
                    precipitation: None,
                    condition: None,
                },
                fetched_at: Utc::now(),
            },
            stale: true,
        };
        let response = WeatherResponse::from_view(&view);
        assert_eq!(response.condition, "N/A");
        assert!(response.stale);
        assert_eq!(response.temperature, Some(24.3));
    }

    #[test]
    fn refresh_response_skipped_marker() {
        let skipped = RefreshResponse::from_outcome(None);
        assert!(!skipped.refreshed);
        assert_eq!(skipped.updated, 0);

        let ran = RefreshResponse::from_outcome(Some(CycleOutcome {
            rebuilt: true,
            candidates: 3,
            applied: 2,
        }));
        assert!(ran.refreshed);
        assert!(ran.rebuilt);
        assert_eq!(ran.candidates, 3);
        assert_eq!(ran.updated, 2);
    }
}
