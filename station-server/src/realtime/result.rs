//! Enrichment result types.

use crate::domain::{ClockTime, TrainId};
use crate::provider::ProviderError;

/// Observed real-time data for one train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Observed arrival time, when the provider reported one.
    pub real_arrival: Option<ClockTime>,

    /// Observed delay text (e.g. "Delayed by 15 min", "Right Time").
    pub delay: Option<String>,
}

/// What a lookup produced.
#[derive(Debug, Clone)]
pub enum EnrichmentOutcome {
    /// The provider reported data for the train.
    Observed(Observation),

    /// The provider answered but had nothing for this train.
    NoData,

    /// The lookup failed: timeout, spawn failure, or unparseable output
    /// (the latter preserves the raw text).
    Failed(ProviderError),
}

/// The one-shot result of a single train lookup.
///
/// Produced by the enrichment client and consumed immediately by the
/// day roster; never stored.
#[derive(Debug, Clone)]
pub struct EnrichmentResult {
    /// The train the lookup was for.
    pub train_id: TrainId,

    /// What came back.
    pub outcome: EnrichmentOutcome,
}

impl EnrichmentResult {
    /// The observation, if the lookup succeeded with data.
    pub fn observed(&self) -> Option<&Observation> {
        match &self.outcome {
            EnrichmentOutcome::Observed(obs) => Some(obs),
            _ => None,
        }
    }

    /// Whether the lookup failed outright.
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, EnrichmentOutcome::Failed(_))
    }
}
