use serde::{Deserialize, Serialize};

use crate::track_id::TrackId;

/// One ranked candidate produced by a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub track_id: TrackId,
    /// Similarity score in `[0, 100]`.
    pub similarity_score: f64,
    pub raw_distance: Option<f64>,
    pub source_seed: Option<TrackId>,
    pub cluster_id: Option<i64>,
}

impl Recommendation {
    pub fn new(track_id: TrackId, similarity_score: f64) -> Self {
        Self {
            track_id,
            similarity_score,
            raw_distance: None,
            source_seed: None,
            cluster_id: None,
        }
    }
}
