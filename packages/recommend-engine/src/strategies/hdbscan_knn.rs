//! Global-audio-KNN strategy (§4.7.2): like `cluster`, but the per-seed
//! search is global rather than scoped to the seed's cluster.

use resonance_recommend_audio_index::AudioIndex;
use resonance_recommend_types::{Recommendation, TrackId};

pub struct Outcome {
    pub recommendations: Vec<Recommendation>,
    pub resolved_seed_count: usize,
}

pub async fn run(index: &AudioIndex, seed_ids: &[TrackId], k: usize) -> Outcome {
    let (recommendations, resolved_seed_count) = super::audio_knn_strategy(index, seed_ids, k, false).await;
    Outcome { recommendations, resolved_seed_count }
}
