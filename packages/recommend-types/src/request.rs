use serde::{Deserialize, Serialize};

use crate::filter::FilterSpec;
use crate::recommendation::Recommendation;
use crate::strategy::Strategy;
use crate::track_id::TrackId;

/// A recommendation request. `seed_ids` must be non-empty; `k` in `[1, 50]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub seed_ids: Vec<TrackId>,
    pub k: u8,
    pub strategy: Strategy,
    pub variant: Option<String>,
    #[serde(default)]
    pub filters: Option<FilterSpec>,
    /// When set, diversity jitter (popularity/hybrid strategies) is derived
    /// deterministically from this seed rather than a thread-local RNG.
    #[serde(default)]
    pub diversity_seed: Option<u64>,
}

impl Request {
    pub const MAX_K: u8 = 50;

    /// Sort and dedup the seed list so two requests naming the same seeds in
    /// a different order hash to the same cache key.
    pub fn normalized_seed_ids(&self) -> Vec<TrackId> {
        let mut seeds = self.seed_ids.clone();
        seeds.sort();
        seeds.dedup();
        seeds
    }
}

/// Response envelope for `recommend` / `similar_by_track`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub recommendations: Vec<Recommendation>,
    pub strategy: Strategy,
    pub variant_ids: VariantIds,
    pub timing_ms: u64,
    pub fallback_used: Option<String>,
}

/// The active variant id per family observed while serving a response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantIds {
    pub audio: Option<String>,
    pub lyrics: Option<String>,
}
