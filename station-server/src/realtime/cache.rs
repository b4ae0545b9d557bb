//! Caching layer for real-time lookups.
//!
//! A lookup spawns an external process, so the scheduled refresh and
//! on-demand requests for the same train within a short window should
//! share one answer. Only lookups that produced data are cached; a
//! failed or empty lookup is retried on the next request.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::TrainId;

use super::client::RealtimeClient;
use super::result::EnrichmentResult;

/// Configuration for the lookup cache.
#[derive(Debug, Clone)]
pub struct RealtimeCacheConfig {
    /// TTL for cached lookups.
    pub ttl: Duration,

    /// Maximum number of cached lookups.
    pub max_capacity: u64,
}

impl Default for RealtimeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 4096,
        }
    }
}

/// Real-time client with a per-train result cache.
pub struct CachedRealtimeClient {
    client: RealtimeClient,
    cache: MokaCache<TrainId, Arc<EnrichmentResult>>,
}

impl CachedRealtimeClient {
    /// Create a new cached client.
    pub fn new(client: RealtimeClient, config: &RealtimeCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { client, cache }
    }

    /// Look up real-time data for a single train, using the cache if a
    /// recent observation exists.
    pub async fn fetch_one(&self, id: &TrainId, name: &str) -> Arc<EnrichmentResult> {
        if let Some(hit) = self.cache.get(id).await {
            return hit;
        }

        let result = Arc::new(self.client.fetch_one(id, name).await);

        if result.observed().is_some() {
            self.cache.insert(id.clone(), result.clone()).await;
        }

        result
    }

    /// Look up a batch of trains concurrently, sharing cached answers.
    pub async fn fetch_many(&self, candidates: &[(TrainId, String)]) -> Vec<Arc<EnrichmentResult>> {
        let lookups = candidates.iter().map(|(id, name)| self.fetch_one(id, name));
        futures::future::join_all(lookups).await
    }

    /// Access the underlying client for operations that bypass the cache.
    pub fn client(&self) -> &RealtimeClient {
        &self.client
    }

    /// Number of cached lookups.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Drop all cached lookups.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
