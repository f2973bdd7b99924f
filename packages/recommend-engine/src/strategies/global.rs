//! Popularity strategy (§4.7.6): the highest-popularity tracks, with a
//! small jitter for diversity. Jitter is derived deterministically from
//! `diversity_seed` when the caller wants reproducible output (§5's
//! ordering guarantees), otherwise from a thread-local RNG.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use resonance_recommend_track_lookup::TrackLookup;
use resonance_recommend_types::{Recommendation, TrackId};

const JITTER_RANGE: f64 = 10.0;

pub struct Outcome {
    pub recommendations: Vec<Recommendation>,
}

pub async fn run(seed_ids: &[TrackId], diversity_seed: Option<u64>, lookup: &dyn TrackLookup) -> Outcome {
    let exclude: HashSet<TrackId> = seed_ids.iter().copied().collect();
    let candidate_ids: Vec<TrackId> = lookup.candidate_pool().await.into_iter().filter(|id| !exclude.contains(id)).collect();
    let records = lookup.lookup(&candidate_ids).await;
    let mut thread_rng = rand::thread_rng();

    let recommendations = candidate_ids
        .into_iter()
        .filter_map(|track_id| {
            let record = records.get(&track_id)?;
            let jitter = match diversity_seed {
                Some(seed) => jitter_for(seed, track_id).gen_range(-JITTER_RANGE..=JITTER_RANGE),
                None => thread_rng.gen_range(-JITTER_RANGE..=JITTER_RANGE),
            };
            let score = (f64::from(record.popularity) + jitter).clamp(0.0, 100.0);
            Some(Recommendation::new(track_id, score))
        })
        .collect();

    Outcome { recommendations }
}

/// A reproducible per-candidate RNG seeded from the request's
/// `diversity_seed` and the candidate's own id, so repeated requests with
/// the same seed produce byte-identical jitter.
fn jitter_for(diversity_seed: u64, track_id: TrackId) -> Xoshiro256Plus {
    let mut hasher = DefaultHasher::new();
    diversity_seed.hash(&mut hasher);
    track_id.as_bytes().hash(&mut hasher);
    Xoshiro256Plus::seed_from_u64(hasher.finish())
}
