//! The result cache (§4.8): sharded, TTL + LRU bounded, single-flight per
//! key. Mirrors the per-cluster cache in `resonance-recommend-audio-index`
//! (`dashmap` + `lru` + `tokio::sync::OnceCell`) for consistency within the
//! workspace, with an added TTL dimension and variant-dependency tracking
//! so a `switch` can invalidate only the entries it actually affects.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use lru::LruCache;
use resonance_recommend_types::Recommendation;
use tokio::sync::OnceCell;

use crate::error::EngineError;
use crate::fingerprint::CacheKey;

/// What a cached entry actually holds: the ranked, filtered recommendations
/// plus whichever fallback note the strategy that produced them reported.
pub type CachedPayload = (Vec<Recommendation>, Option<String>);

struct CacheEntry {
    payload: CachedPayload,
    stored_at: Instant,
    ttl: Duration,
    depends_on: Vec<String>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) >= self.ttl
    }
}

pub struct ResultCache {
    entries: DashMap<CacheKey, Arc<OnceCell<CacheEntry>>>,
    recency: Mutex<LruCache<CacheKey, ()>>,
    default_ttl: Duration,
}

impl ResultCache {
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            entries: DashMap::new(),
            recency: Mutex::new(LruCache::new(capacity)),
            default_ttl,
        }
    }

    /// Returns a cached, unexpired result if one exists, touching recency.
    pub async fn get(&self, key: CacheKey) -> Option<CachedPayload> {
        let cell = self.entries.get(&key)?.clone();
        let entry = cell.get()?;
        if entry.is_expired(Instant::now()) {
            self.entries.remove(&key);
            return None;
        }
        self.touch(key);
        Some(entry.payload.clone())
    }

    /// Returns the cached result for `key`, building it via `build` if
    /// absent or expired. Concurrent callers for the same key share a
    /// single in-flight build (single-flight coalescing, as in C3). A
    /// `build` that errors leaves the key uninitialized so the next caller
    /// retries rather than caching the failure (e.g. `NoValidSeeds`, which
    /// may stop applying once the host's catalog changes).
    pub async fn get_or_build<F, Fut>(
        &self,
        key: CacheKey,
        depends_on: Vec<String>,
        ttl: Option<Duration>,
        build: F,
    ) -> Result<CachedPayload, EngineError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<CachedPayload, EngineError>>,
    {
        if let Some(existing) = self.get(key).await {
            return Ok(existing);
        }

        // A stale cell (expired, removed above) leaves no trace in
        // `entries`, so `or_insert_with` always starts a fresh build here.
        let cell = self.entries.entry(key).or_insert_with(|| Arc::new(OnceCell::new())).clone();

        let result = cell
            .get_or_try_init(|| async {
                Ok::<_, EngineError>(CacheEntry {
                    payload: build().await?,
                    stored_at: Instant::now(),
                    ttl: ttl.unwrap_or(self.default_ttl),
                    depends_on,
                })
            })
            .await;

        match result {
            Ok(entry) => {
                self.touch(key);
                Ok(entry.payload.clone())
            }
            Err(e) => {
                // Nothing was inserted; drop the now-empty cell so a later
                // `switch` doesn't try to invalidate a key that holds none.
                self.entries.remove_if(&key, |_, cell| cell.get().is_none());
                Err(e)
            }
        }
    }

    /// Drops every cached entry whose key depends on `variant_id` (§4.8: a
    /// `switch` invalidates entries that depend on the switched variant).
    pub fn invalidate_dependents(&self, variant_id: &str) {
        self.entries.retain(|_, cell| match cell.get() {
            Some(entry) => !entry.depends_on.iter().any(|d| d == variant_id),
            None => true,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&self, key: CacheKey) {
        let mut recency = self.recency.lock().unwrap();
        if let Some((evicted, _)) = recency.push(key, ()) {
            if evicted != key {
                self.entries.remove(&evicted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_recommend_types::TrackId;

    fn track(i: u8) -> TrackId {
        let mut bytes = [0u8; 22];
        bytes[0] = i;
        TrackId::from_bytes(bytes)
    }

    fn key(n: u64) -> CacheKey {
        // CacheKey's inner field is private; route through fingerprint in
        // integration-level tests instead where an actual Request exists.
        // Here we test `ResultCache` in isolation via a transmute-free
        // constructor substitute: reuse fingerprint with distinct requests.
        let req = resonance_recommend_types::Request {
            seed_ids: vec![track(n as u8)],
            k: 5,
            strategy: resonance_recommend_types::Strategy::Global,
            variant: None,
            filters: None,
            diversity_seed: None,
        };
        crate::fingerprint::fingerprint(&req, &resonance_recommend_types::FilterSpec::default(), &[])
    }

    fn payload(track_id: TrackId, score: f64) -> CachedPayload {
        (vec![Recommendation::new(track_id, score)], None)
    }

    #[tokio::test]
    async fn miss_then_hit_returns_the_built_value() {
        let cache = ResultCache::new(10, Duration::from_secs(60));
        let k = key(1);

        let result = cache.get_or_build(k, vec![], None, || async { Ok(payload(track(2), 90.0)) }).await.unwrap();
        assert_eq!(result.0.len(), 1);

        let cached = cache.get(k).await.unwrap();
        assert_eq!(cached, result);
    }

    #[tokio::test]
    async fn expired_entries_are_not_returned() {
        let cache = ResultCache::new(10, Duration::from_millis(5));
        let k = key(1);

        cache.get_or_build(k, vec![], None, || async { Ok(payload(track(2), 50.0)) }).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.get(k).await.is_none());
    }

    #[tokio::test]
    async fn a_failed_build_leaves_the_key_retryable() {
        let cache = ResultCache::new(10, Duration::from_secs(60));
        let k = key(1);

        let err = cache.get_or_build(k, vec![], None, || async { Err(EngineError::NoValidSeeds) }).await.unwrap_err();
        assert!(matches!(err, EngineError::NoValidSeeds));
        assert!(cache.get(k).await.is_none());

        let result = cache.get_or_build(k, vec![], None, || async { Ok(payload(track(2), 10.0)) }).await.unwrap();
        assert_eq!(result.0.len(), 1);
    }

    #[tokio::test]
    async fn invalidate_dependents_drops_only_matching_entries() {
        let cache = ResultCache::new(10, Duration::from_secs(60));
        let a = key(1);
        let b = key(2);

        cache
            .get_or_build(a, vec!["audio:v1".to_string()], None, || async { Ok(payload(track(2), 10.0)) })
            .await
            .unwrap();
        cache
            .get_or_build(b, vec!["audio:v2".to_string()], None, || async { Ok(payload(track(3), 10.0)) })
            .await
            .unwrap();

        cache.invalidate_dependents("audio:v1");
        assert!(cache.get(a).await.is_none());
        assert!(cache.get(b).await.is_some());
    }

    #[tokio::test]
    async fn capacity_evicts_the_least_recently_used_entry() {
        let cache = ResultCache::new(1, Duration::from_secs(60));
        let a = key(1);
        let b = key(2);

        cache.get_or_build(a, vec![], None, || async { Ok(payload(track(2), 1.0)) }).await.unwrap();
        cache.get_or_build(b, vec![], None, || async { Ok(payload(track(3), 1.0)) }).await.unwrap();

        assert!(cache.get(a).await.is_none());
        assert!(cache.get(b).await.is_some());
    }
}
