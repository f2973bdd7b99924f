//! Hybrid strategy (§4.7.7): blends `cluster` (weight 0.4), `global`
//! (weight 0.3), and `artist_based` (weight 0.3), rewarding candidates
//! multiple methods agree on. Grounded on the API's
//! `find_similar_combined`'s weighted-merge-by-`HashMap` shape.

use std::collections::HashMap;

use resonance_recommend_audio_index::AudioIndex;
use resonance_recommend_track_lookup::TrackLookup;
use resonance_recommend_types::{Recommendation, TrackId};

const WEIGHT_CLUSTER: f64 = 0.4;
const WEIGHT_GLOBAL: f64 = 0.3;
const WEIGHT_ARTIST: f64 = 0.3;
const DIVERSITY_BONUS_PER_METHOD: f64 = 5.0;

pub struct Outcome {
    pub recommendations: Vec<Recommendation>,
    pub resolved_seed_count: usize,
}

struct Accumulator {
    weighted_score: f64,
    contributing_methods: u32,
    source_seed: Option<TrackId>,
    cluster_id: Option<i64>,
}

pub async fn run(
    audio_index: &AudioIndex,
    seed_ids: &[TrackId],
    k: usize,
    diversity_seed: Option<u64>,
    lookup: &dyn TrackLookup,
) -> Outcome {
    let cluster = super::cluster::run(audio_index, seed_ids, k).await;
    let global = super::global::run(seed_ids, diversity_seed, lookup).await;
    let artist = super::artist_based::run(seed_ids, lookup).await;

    let mut combined: HashMap<TrackId, Accumulator> = HashMap::new();
    merge(&mut combined, cluster.recommendations, WEIGHT_CLUSTER);
    merge(&mut combined, global.recommendations, WEIGHT_GLOBAL);
    merge(&mut combined, artist.recommendations, WEIGHT_ARTIST);

    let recommendations = combined
        .into_iter()
        .map(|(track_id, acc)| {
            let score = (acc.weighted_score + DIVERSITY_BONUS_PER_METHOD * f64::from(acc.contributing_methods)).clamp(0.0, 100.0);
            Recommendation { track_id, similarity_score: score, raw_distance: None, source_seed: acc.source_seed, cluster_id: acc.cluster_id }
        })
        .collect();

    Outcome { recommendations, resolved_seed_count: cluster.resolved_seed_count.max(artist.resolved_seed_count) }
}

fn merge(combined: &mut HashMap<TrackId, Accumulator>, recs: Vec<Recommendation>, weight: f64) {
    for rec in recs {
        let entry = combined.entry(rec.track_id).or_insert(Accumulator {
            weighted_score: 0.0,
            contributing_methods: 0,
            source_seed: None,
            cluster_id: None,
        });
        entry.weighted_score += rec.similarity_score * weight;
        entry.contributing_methods += 1;
        entry.source_seed = entry.source_seed.or(rec.source_seed);
        entry.cluster_id = entry.cluster_id.or(rec.cluster_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_matches_the_spec() {
        // §8 S5: cluster=60 (weight .4), artist_based=50 (weight .3), global absent.
        let mut combined: HashMap<TrackId, Accumulator> = HashMap::new();
        let mut bytes = [0u8; 22];
        bytes[0] = 42;
        let candidate = TrackId::from_bytes(bytes);

        merge(&mut combined, vec![Recommendation::new(candidate, 60.0)], WEIGHT_CLUSTER);
        merge(&mut combined, vec![Recommendation::new(candidate, 50.0)], WEIGHT_ARTIST);

        let acc = &combined[&candidate];
        let score = (acc.weighted_score + DIVERSITY_BONUS_PER_METHOD * f64::from(acc.contributing_methods)).clamp(0.0, 100.0);
        assert!((score - 49.0).abs() < 1e-9);
    }
}
