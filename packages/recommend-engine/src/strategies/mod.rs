//! Recommendation strategies (§4.7). Every strategy converts a seed set
//! into a ranked, de-duplicated candidate list; it never returns a seed
//! track, and its scores are comparable (`[0, 100]`) even though the
//! underlying signal differs from strategy to strategy.
//!
//! Filtering (`FilterSpec`), the final `(score, popularity, track_id)`
//! tie-break sort, and truncation to `k` are applied once, centrally, by
//! the facade after a strategy returns — they need the host's
//! `TrackLookup` data (popularity, year, artist) that most strategies
//! never touch, so doing it per-strategy would mean looking the same
//! tracks up repeatedly.

pub mod artist_based;
pub mod cluster;
pub mod genre_based;
pub mod global;
pub mod hdbscan_knn;
pub mod hybrid;
pub mod lyrics;

use std::collections::{HashMap, HashSet};

use resonance_recommend_audio_index::AudioIndex;
use resonance_recommend_types::{Recommendation, TrackId};

/// Pools per-seed candidate lists into one list, keeping the
/// highest-scoring occurrence of each candidate track and recording which
/// seed produced that best score (§4.7.1/4.7.2/4.7.3: "group by track_id
/// keeping the maximum similarity across seeds").
pub(crate) fn pool_by_max_score(
    seed_candidates: impl IntoIterator<Item = (TrackId, Vec<Recommendation>)>,
    exclude: &HashSet<TrackId>,
) -> Vec<Recommendation> {
    let mut best: HashMap<TrackId, Recommendation> = HashMap::new();
    for (seed, candidates) in seed_candidates {
        for mut candidate in candidates {
            if exclude.contains(&candidate.track_id) {
                continue;
            }
            candidate.source_seed = Some(seed);
            best.entry(candidate.track_id)
                .and_modify(|existing| {
                    if candidate.similarity_score > existing.similarity_score {
                        *existing = candidate.clone();
                    }
                })
                .or_insert(candidate);
        }
    }
    best.into_values().collect()
}

/// Shared core of the cluster (4.7.1) and global-audio-KNN (4.7.2)
/// strategies: both pool per-seed nearest-neighbor results from C3 and
/// differ only in whether the search is cluster-scoped.
pub(crate) async fn audio_knn_strategy(
    index: &AudioIndex,
    seed_ids: &[TrackId],
    k: usize,
    cluster_scoped: bool,
) -> (Vec<Recommendation>, usize) {
    let exclude: HashSet<TrackId> = seed_ids.iter().copied().collect();
    let mut per_seed = Vec::with_capacity(seed_ids.len());
    let mut resolved = 0usize;

    for &seed in seed_ids {
        let neighbors = if cluster_scoped {
            index.knn_cluster_scoped(seed, k * 2).await
        } else {
            index.knn_by_track(seed, k * 2)
        };

        match neighbors {
            Ok(neighbors) => {
                resolved += 1;
                let distances: Vec<f64> = neighbors.iter().map(|(_, d)| *d).collect();
                let scores = resonance_recommend_normalize::normalize_to_percent(&distances, index.descriptor().similarity_method);
                let recs = neighbors
                    .into_iter()
                    .zip(scores)
                    .map(|((track_id, distance), score)| Recommendation {
                        track_id,
                        similarity_score: score,
                        raw_distance: Some(distance),
                        source_seed: None,
                        cluster_id: index.cluster_of(track_id).map(i64::from),
                    })
                    .collect();
                per_seed.push((seed, recs));
            }
            Err(e) => {
                tracing::warn!(seed = %seed, error = %e, "seed not resolvable in active audio variant, skipping");
            }
        }
    }

    (pool_by_max_score(per_seed, &exclude), resolved)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap as StdHashMap;

    use resonance_recommend_artifacts::{AudioVariantArtifacts, DenseMatrixFile};
    use resonance_recommend_types::{Family, Metric, SimilarityMethod, VariantDescriptor};

    use super::*;

    fn track(i: u8) -> TrackId {
        let mut bytes = [0u8; 22];
        bytes[0] = i;
        TrackId::from_bytes(bytes)
    }

    /// Seed at row 0 is noise (`-1`), so `knn_cluster_scoped` falls back to a
    /// global search; the returned neighbors span clusters 0 and 1.
    fn fallback_fixture() -> AudioIndex {
        let points: Vec<[f32; 2]> = vec![[0.0, 0.0], [0.1, 0.0], [10.0, 10.0]];
        let labels = vec![-1, 0, 1];
        let n = points.len();
        let data: Vec<f32> = points.into_iter().flatten().collect();
        let track_ids: Vec<TrackId> = (0..n as u8).map(track).collect();
        let row_by_track_id: StdHashMap<TrackId, usize> = track_ids.iter().enumerate().map(|(r, t)| (*t, r)).collect();

        let descriptor = VariantDescriptor {
            family: Family::Audio,
            name: "fixture".to_string(),
            has_projection: false,
            metric: Metric::Euclidean,
            cluster_scoped: true,
            projection_dim: None,
            min_cluster_size: Some(2),
            similarity_method: SimilarityMethod::Exponential,
        };

        let artifacts = AudioVariantArtifacts {
            descriptor,
            embeddings: DenseMatrixFile { rows: n, cols: 2, data },
            cluster_labels: labels,
            track_ids,
            row_by_track_id,
            had_precomputed_knn: false,
        };

        AudioIndex::build(artifacts, Some(4))
    }

    #[tokio::test]
    async fn cluster_id_reflects_each_candidates_own_cluster_during_fallback() {
        let index = fallback_fixture();

        let (recs, resolved) = audio_knn_strategy(&index, &[track(0)], 2, true).await;
        assert_eq!(resolved, 1);
        assert_eq!(recs.len(), 2);

        let by_id: HashMap<TrackId, &Recommendation> = recs.iter().map(|r| (r.track_id, r)).collect();
        assert_eq!(by_id[&track(1)].cluster_id, Some(0));
        assert_eq!(by_id[&track(2)].cluster_id, Some(1));
    }

    #[test]
    fn pooling_keeps_the_highest_score_and_excludes_seeds() {
        let seed_a = track(1);
        let seed_b = track(2);
        let candidate = track(9);

        let per_seed = vec![
            (seed_a, vec![Recommendation::new(candidate, 40.0), Recommendation::new(seed_b, 99.0)]),
            (seed_b, vec![Recommendation::new(candidate, 70.0)]),
        ];
        let exclude: HashSet<TrackId> = [seed_a, seed_b].into_iter().collect();

        let pooled = pool_by_max_score(per_seed, &exclude);
        assert_eq!(pooled.len(), 1);
        assert_eq!(pooled[0].track_id, candidate);
        assert_eq!(pooled[0].similarity_score, 70.0);
        assert_eq!(pooled[0].source_seed, Some(seed_b));
    }
}
