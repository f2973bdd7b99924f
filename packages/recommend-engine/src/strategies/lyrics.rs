//! Lyrics strategy (§4.7.3): per seed, a nearest-neighbor search over C4's
//! TF-IDF/SVD space. Seeds without stored lyrics are skipped, not failed;
//! if every seed lacks lyrics the strategy falls back to `cluster` (§7,
//! §9's lyrics-preprocessing-drift note doesn't apply here — this is a
//! missing-data fallback, not a preprocessing one).

use std::collections::HashSet;

use resonance_recommend_audio_index::AudioIndex;
use resonance_recommend_lyrics_index::LyricsIndex;
use resonance_recommend_track_lookup::TrackLookup;
use resonance_recommend_types::{Recommendation, TrackId};
use tracing::warn;

use super::pool_by_max_score;

pub struct Outcome {
    pub recommendations: Vec<Recommendation>,
    pub resolved_seed_count: usize,
    pub fallback_used: Option<&'static str>,
}

pub async fn run(
    lyrics_index: &LyricsIndex,
    audio_index: &AudioIndex,
    seed_ids: &[TrackId],
    k: usize,
    lookup: &dyn TrackLookup,
) -> Outcome {
    let exclude: HashSet<TrackId> = seed_ids.iter().copied().collect();
    let mut per_seed = Vec::with_capacity(seed_ids.len());
    let mut resolved = 0usize;

    for &seed in seed_ids {
        match lyrics_index.knn_by_track(seed, k * 2, lookup).await {
            Ok(neighbors) => {
                resolved += 1;
                let distances: Vec<f64> = neighbors.iter().map(|(_, d)| *d).collect();
                let scores =
                    resonance_recommend_normalize::normalize_to_percent(&distances, lyrics_index.descriptor().similarity_method);
                let recs = neighbors
                    .into_iter()
                    .zip(scores)
                    .map(|((track_id, distance), score)| Recommendation {
                        track_id,
                        similarity_score: score,
                        raw_distance: Some(distance),
                        source_seed: None,
                        cluster_id: None,
                    })
                    .collect();
                per_seed.push((seed, recs));
            }
            Err(e) => {
                warn!(seed = %seed, error = %e, "seed has no usable lyrics, skipping");
            }
        }
    }

    if resolved == 0 {
        warn!("all seeds lack lyrics, falling back to cluster strategy");
        let fallback = super::cluster::run(audio_index, seed_ids, k).await;
        return Outcome {
            recommendations: fallback.recommendations,
            resolved_seed_count: fallback.resolved_seed_count,
            fallback_used: Some("cluster"),
        };
    }

    Outcome { recommendations: pool_by_max_score(per_seed, &exclude), resolved_seed_count: resolved, fallback_used: None }
}
