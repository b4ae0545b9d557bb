//! Real-time train lookup client.
//!
//! Wraps the external real-time lookup provider: one invocation per
//! train, keyed by a slug of the train's name and number. Lookups are
//! best-effort — every failure mode degrades to an error-flagged result
//! so a batch always completes with whatever data arrived.

mod cache;
mod client;
mod result;

pub use cache::{CachedRealtimeClient, RealtimeCacheConfig};
pub use client::{RealtimeClient, RealtimeConfig, lookup_key};
pub use result::{EnrichmentOutcome, EnrichmentResult, Observation};
