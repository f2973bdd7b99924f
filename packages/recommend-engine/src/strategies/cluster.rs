//! Audio-cluster strategy (§4.7.1): per seed, a cluster-scoped nearest
//! neighbor search over C3, pooled across seeds.

use resonance_recommend_audio_index::AudioIndex;
use resonance_recommend_types::{Recommendation, TrackId};

pub struct Outcome {
    pub recommendations: Vec<Recommendation>,
    pub resolved_seed_count: usize,
}

pub async fn run(index: &AudioIndex, seed_ids: &[TrackId], k: usize) -> Outcome {
    let (recommendations, resolved_seed_count) = super::audio_knn_strategy(index, seed_ids, k, true).await;
    Outcome { recommendations, resolved_seed_count }
}
