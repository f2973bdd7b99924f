//! Artist-based strategy (§4.7.4): recommends other tracks by the seeds'
//! primary artists, scored higher when the candidate's own primary artist
//! is one of the seeds' primary artists.

use std::collections::{HashMap, HashSet};

use resonance_recommend_track_lookup::TrackLookup;
use resonance_recommend_types::{Recommendation, TrackId};
use tracing::warn;

const SAME_ARTIST_BASE: f64 = 85.0;
const OTHER_ARTIST_BASE: f64 = 30.0;

pub struct Outcome {
    pub recommendations: Vec<Recommendation>,
    pub resolved_seed_count: usize,
}

pub async fn run(seed_ids: &[TrackId], lookup: &dyn TrackLookup) -> Outcome {
    let seed_records = lookup.lookup(seed_ids).await;
    let exclude: HashSet<TrackId> = seed_ids.iter().copied().collect();

    let seed_artist_ids: HashSet<String> = seed_ids
        .iter()
        .filter_map(|id| {
            if let Some(record) = seed_records.get(id) {
                Some(record.artist_id.clone())
            } else {
                warn!(seed = %id, "seed not resolvable via track lookup, skipping");
                None
            }
        })
        .collect();

    if seed_artist_ids.is_empty() {
        return Outcome { recommendations: Vec::new(), resolved_seed_count: 0 };
    }

    let mut candidate_ids: Vec<TrackId> = Vec::new();
    for artist_id in &seed_artist_ids {
        candidate_ids.extend(lookup.tracks_by_artist(artist_id).await);
    }
    candidate_ids.retain(|id| !exclude.contains(id));

    let candidate_records = lookup.lookup(&candidate_ids).await;

    let mut best: HashMap<TrackId, Recommendation> = HashMap::new();
    for track_id in candidate_ids {
        let Some(record) = candidate_records.get(&track_id) else { continue };
        let base = if seed_artist_ids.contains(&record.artist_id) { SAME_ARTIST_BASE } else { OTHER_ARTIST_BASE };
        let score = (base + f64::from(record.popularity) / 10.0).clamp(0.0, 100.0);
        best.entry(track_id).or_insert_with(|| Recommendation::new(track_id, score));
    }

    Outcome { recommendations: best.into_values().collect(), resolved_seed_count: seed_artist_ids.len() }
}
