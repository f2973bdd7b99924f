//! Lazy, memoized per-cluster row-index sub-structures with bounded
//! concurrent access (§4.3: `NotBuilt -> Building -> Ready`, LRU-bounded).

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use lru::LruCache;
use tokio::sync::OnceCell;

/// Row indices (into the variant's embedding matrix) that share a cluster
/// label. Building one is just a filter over `cluster_labels`, but it is
/// still coalesced through a `OnceCell` so concurrent callers for the same
/// cold cluster share one build rather than each scanning independently.
pub struct ClusterSubIndex {
    pub rows: Vec<usize>,
}

pub struct ClusterCache {
    entries: DashMap<i32, Arc<OnceCell<Arc<ClusterSubIndex>>>>,
    recency: Mutex<LruCache<i32, ()>>,
}

impl ClusterCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            entries: DashMap::new(),
            recency: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the cached or newly built sub-index for `label`, coalescing
    /// concurrent builders for the same cold cluster onto one `build` call.
    pub async fn get_or_build<F, E>(&self, label: i32, build: F) -> Result<Arc<ClusterSubIndex>, E>
    where
        F: FnOnce() -> Result<ClusterSubIndex, E>,
    {
        let cell = self
            .entries
            .entry(label)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = cell.get_or_try_init(|| async { build().map(Arc::new) }).await;

        if result.is_ok() {
            self.touch_and_evict(label);
        }

        result.cloned()
    }

    fn touch_and_evict(&self, label: i32) {
        let mut recency = self.recency.lock().unwrap();
        if let Some((evicted, _)) = recency.push(label, ()) {
            if evicted != label {
                self.entries.remove(&evicted);
            }
        }
    }
}
