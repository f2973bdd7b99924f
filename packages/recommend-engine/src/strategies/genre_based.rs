//! Genre-based strategy (§4.7.5): averages the seeds' normalized audio
//! features and ranks a host-supplied "popular enough" candidate pool by
//! how close each candidate's own feature vector is to that average.

use std::collections::HashSet;

use resonance_recommend_track_lookup::TrackLookup;
use resonance_recommend_types::{Recommendation, TrackId, TrackRecord};

const MAX_TEMPO: f32 = 250.0;
const FEATURE_COUNT: f32 = 5.0;

fn feature_vector(record: &TrackRecord) -> [f32; 5] {
    let s = &record.audio_feature_summary;
    [s.danceability, s.energy, s.valence, s.acousticness, (record.tempo / MAX_TEMPO).clamp(0.0, 1.0)]
}

pub struct Outcome {
    pub recommendations: Vec<Recommendation>,
    pub resolved_seed_count: usize,
}

pub async fn run(seed_ids: &[TrackId], lookup: &dyn TrackLookup) -> Outcome {
    let seed_records = lookup.lookup(seed_ids).await;
    let exclude: HashSet<TrackId> = seed_ids.iter().copied().collect();

    let resolved_vectors: Vec<[f32; 5]> = seed_ids.iter().filter_map(|id| seed_records.get(id).map(feature_vector)).collect();
    if resolved_vectors.is_empty() {
        return Outcome { recommendations: Vec::new(), resolved_seed_count: 0 };
    }

    let mut seed_avg = [0.0f32; 5];
    for vector in &resolved_vectors {
        for (avg, value) in seed_avg.iter_mut().zip(vector.iter()) {
            *avg += value;
        }
    }
    for avg in seed_avg.iter_mut() {
        *avg /= resolved_vectors.len() as f32;
    }

    let candidate_ids: Vec<TrackId> = lookup.candidate_pool().await.into_iter().filter(|id| !exclude.contains(id)).collect();
    let candidate_records = lookup.lookup(&candidate_ids).await;

    let recommendations = candidate_ids
        .into_iter()
        .filter_map(|track_id| {
            let record = candidate_records.get(&track_id)?;
            let vector = feature_vector(record);
            let avg_diff: f32 = seed_avg.iter().zip(vector.iter()).map(|(a, b)| (a - b).abs()).sum::<f32>() / FEATURE_COUNT;
            let feature_similarity = f64::from((1.0 - avg_diff).clamp(0.0, 1.0));
            let score = (100.0 * feature_similarity + f64::from(record.popularity) / 10.0).clamp(0.0, 100.0);
            Some(Recommendation::new(track_id, score))
        })
        .collect();

    Outcome { recommendations, resolved_seed_count: resolved_vectors.len() }
}
