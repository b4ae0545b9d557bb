//! Real-time lookup client.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::domain::{ClockTime, TrainId};
use crate::provider::{ProviderCommand, ProviderError, field_str, loose_json};

use super::result::{EnrichmentOutcome, EnrichmentResult, Observation};

/// Default maximum concurrent provider processes.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the real-time lookup client.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// How to invoke the lookup provider.
    pub command: ProviderCommand,

    /// Maximum concurrent provider processes.
    pub max_concurrent: usize,
}

impl RealtimeConfig {
    /// Create a config for the given provider command.
    pub fn new(command: ProviderCommand) -> Self {
        Self {
            command,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Set the maximum number of concurrent provider processes.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }
}

/// Format the provider lookup key for a train.
///
/// The name is lower-cased with whitespace runs collapsed to single
/// hyphens, and the train number is appended.
///
/// # Examples
///
/// ```
/// use station_server::domain::TrainId;
/// use station_server::realtime::lookup_key;
///
/// let id = TrainId::parse("12345").unwrap();
/// assert_eq!(lookup_key("Rajdhani Express", &id), "rajdhani-express-12345");
/// ```
pub fn lookup_key(name: &str, id: &TrainId) -> String {
    let mut key = String::with_capacity(name.len() + id.as_str().len() + 1);
    for part in name.split_whitespace() {
        for c in part.chars() {
            key.extend(c.to_lowercase());
        }
        key.push('-');
    }
    key.push_str(id.as_str());
    key
}

/// Client for the external real-time lookup provider.
///
/// One provider process per train; a semaphore bounds how many run at
/// once. Lookups never return `Err` — failures become error-flagged
/// results so batch fan-outs always complete.
pub struct RealtimeClient {
    command: ProviderCommand,
    semaphore: Arc<Semaphore>,
}

impl RealtimeClient {
    /// Create a client with the given configuration.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            command: config.command,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        }
    }

    /// Look up real-time data for a single train.
    pub async fn fetch_one(&self, id: &TrainId, name: &str) -> EnrichmentResult {
        let key = lookup_key(name, id);

        let outcome = match self.semaphore.acquire().await {
            Ok(_permit) => match self.command.invoke(&[&key]).await {
                Ok(raw) => parse_outcome(&raw),
                Err(e) => EnrichmentOutcome::Failed(e),
            },
            Err(_) => EnrichmentOutcome::Failed(ProviderError::Unavailable {
                message: "lookup semaphore closed".into(),
            }),
        };

        if let EnrichmentOutcome::Failed(e) = &outcome {
            tracing::warn!(train = %id, key = %key, error = %e, "real-time lookup failed");
        }

        EnrichmentResult {
            train_id: id.clone(),
            outcome,
        }
    }

    /// Look up real-time data for a batch of trains concurrently.
    ///
    /// Returns one result per candidate, in input order. A failing
    /// candidate never cancels the batch.
    pub async fn fetch_many(&self, candidates: &[(TrainId, String)]) -> Vec<EnrichmentResult> {
        let lookups = candidates.iter().map(|(id, name)| self.fetch_one(id, name));
        futures::future::join_all(lookups).await
    }
}

/// Interpret raw provider output.
fn parse_outcome(raw: &str) -> EnrichmentOutcome {
    if raw.trim().is_empty() {
        return EnrichmentOutcome::NoData;
    }

    let value = match loose_json(raw) {
        Ok(v) => v,
        Err(e) => return EnrichmentOutcome::Failed(e),
    };

    let real_arrival =
        field_str(&value, "real_arrival").and_then(|s| ClockTime::parse_hhmm(&s).ok());
    let delay = field_str(&value, "delay");

    if real_arrival.is_none() && delay.is_none() {
        EnrichmentOutcome::NoData
    } else {
        EnrichmentOutcome::Observed(Observation {
            real_arrival,
            delay,
        })
    }
}
