//! Station weather, cached.
//!
//! Wraps the external weather provider behind a single-snapshot cache
//! with a 30-minute TTL. A provider failure after expiry serves the
//! previous snapshot marked stale rather than an error; only a failure
//! with no snapshot at all surfaces to the caller.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::provider::{ProviderCommand, ProviderError, field_f64, field_str, loose_json};

/// Default snapshot TTL: 30 minutes.
const DEFAULT_TTL_MINS: i64 = 30;

/// Configuration for the weather service.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// How to invoke the weather provider.
    pub command: ProviderCommand,

    /// How long a snapshot stays fresh.
    pub ttl: Duration,
}

impl WeatherConfig {
    /// Create a config for the given provider command with the default TTL.
    pub fn new(command: ProviderCommand) -> Self {
        Self {
            command,
            ttl: Duration::minutes(DEFAULT_TTL_MINS),
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// One weather report, extracted tolerantly.
///
/// Providers sometimes emit "N/A" in place of a number; such fields are
/// simply absent here.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
    pub condition: Option<String>,
}

/// The process-wide weather snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// The reading the provider returned.
    pub reading: WeatherReading,

    /// When the reading was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// A served snapshot, flagged when it outlived the TTL.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub snapshot: WeatherSnapshot,
    pub stale: bool,
}

/// Weather provider wrapper with a TTL cache.
///
/// Exactly one snapshot is live at a time; a successful refresh replaces
/// it in a single assignment under the write lock.
pub struct WeatherService {
    command: ProviderCommand,
    ttl: Duration,
    slot: RwLock<Option<Arc<WeatherSnapshot>>>,
}

impl WeatherService {
    /// Create a new weather service.
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            command: config.command,
            ttl: config.ttl,
            slot: RwLock::new(None),
        }
    }

    /// The current weather, from cache when fresh.
    pub async fn current(&self) -> Result<WeatherView, ProviderError> {
        self.current_at(Utc::now()).await
    }

    /// The current weather relative to an explicit "now".
    pub async fn current_at(&self, now: DateTime<Utc>) -> Result<WeatherView, ProviderError> {
        {
            let guard = self.slot.read().await;
            if let Some(snapshot) = guard.as_ref()
                && now.signed_duration_since(snapshot.fetched_at) < self.ttl
            {
                return Ok(WeatherView {
                    snapshot: snapshot.as_ref().clone(),
                    stale: false,
                });
            }
        }

        match self.fetch().await {
            Ok(reading) => {
                let snapshot = Arc::new(WeatherSnapshot {
                    reading,
                    fetched_at: now,
                });
                let mut guard = self.slot.write().await;
                *guard = Some(snapshot.clone());
                Ok(WeatherView {
                    snapshot: snapshot.as_ref().clone(),
                    stale: false,
                })
            }
            Err(e) => {
                let guard = self.slot.read().await;
                match guard.as_ref() {
                    Some(previous) => {
                        tracing::warn!(error = %e, "weather refresh failed; serving stale snapshot");
                        Ok(WeatherView {
                            snapshot: previous.as_ref().clone(),
                            stale: true,
                        })
                    }
                    None => Err(e),
                }
            }
        }
    }

    async fn fetch(&self) -> Result<WeatherReading, ProviderError> {
        let raw = self.command.invoke(&[]).await?;
        parse_reading(&raw)
    }
}

/// Parse provider output into a reading.
fn parse_reading(raw: &str) -> Result<WeatherReading, ProviderError> {
    let value = loose_json(raw)?;
    Ok(WeatherReading {
        temperature: field_f64(&value, "temperature"),
        humidity: field_f64(&value, "humidity"),
        precipitation: field_f64(&value, "precipitation"),
        condition: field_str(&value, "condition"),
    })
}
