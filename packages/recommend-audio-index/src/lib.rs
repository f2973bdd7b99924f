//! Cluster-constrained and global K-nearest-neighbor search over dense
//! audio embeddings (§4.3).

mod cluster_cache;
mod error;

use std::collections::HashMap;

use ndarray::Array2;
use resonance_recommend_artifacts::AudioVariantArtifacts;
use resonance_recommend_types::{TrackId, VariantDescriptor};
use tracing::warn;

pub use error::AudioIndexError;

use cluster_cache::{ClusterCache, ClusterSubIndex};

const DEFAULT_PER_CLUSTER_CACHE_CAPACITY: usize = 64;

/// One loaded audio variant's embedding matrix plus cluster labels, serving
/// KNN queries over it. Immutable for the lifetime of the variant (§3
/// lifecycles) — replacing the active variant builds a new `AudioIndex`.
pub struct AudioIndex {
    descriptor: VariantDescriptor,
    embeddings: Array2<f32>,
    track_ids: Vec<TrackId>,
    row_by_track_id: HashMap<TrackId, usize>,
    cluster_labels: Vec<i32>,
    cluster_cache: ClusterCache,
}

impl AudioIndex {
    pub fn build(artifacts: AudioVariantArtifacts, per_cluster_cache_capacity: Option<usize>) -> Self {
        let rows = artifacts.embeddings.rows;
        let cols = artifacts.embeddings.cols;
        let embeddings = Array2::from_shape_vec((rows, cols), artifacts.embeddings.data)
            .expect("artifact loader already validated embeddings shape");

        Self {
            descriptor: artifacts.descriptor,
            embeddings,
            track_ids: artifacts.track_ids,
            row_by_track_id: artifacts.row_by_track_id,
            cluster_labels: artifacts.cluster_labels,
            cluster_cache: ClusterCache::new(per_cluster_cache_capacity.unwrap_or(DEFAULT_PER_CLUSTER_CACHE_CAPACITY)),
        }
    }

    pub fn descriptor(&self) -> &VariantDescriptor {
        &self.descriptor
    }

    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }

    /// The cluster label of `track_id`, or `None` for noise (`-1`) or an
    /// unknown track.
    pub fn cluster_of(&self, track_id: TrackId) -> Option<i32> {
        let row = *self.row_by_track_id.get(&track_id)?;
        match self.cluster_labels[row] {
            -1 => None,
            label => Some(label),
        }
    }

    /// Global K-nearest-neighbor search, excluding the seed itself.
    pub fn knn_by_track(&self, track_id: TrackId, k: usize) -> Result<Vec<(TrackId, f64)>, AudioIndexError> {
        let row = self.row_of(track_id)?;
        Ok(self.knn_over_rows(row, k, (0..self.track_ids.len()).filter(|&r| r != row)))
    }

    /// Cluster-scoped KNN: falls back to global search when the seed is
    /// noise (`-1`) or its cluster has fewer than `k + 1` members (§4.3).
    pub async fn knn_cluster_scoped(&self, track_id: TrackId, k: usize) -> Result<Vec<(TrackId, f64)>, AudioIndexError> {
        let row = self.row_of(track_id)?;
        let label = self.cluster_labels[row];

        if label == -1 {
            return self.knn_by_track(track_id, k);
        }

        let sub_index = match self.cluster_cache.get_or_build(label, || self.build_cluster_sub_index(label)).await {
            Ok(sub) => sub,
            Err(e) => {
                warn!(cluster = label, error = %e, "cluster sub-index build failed, falling back to global search");
                return self.knn_by_track(track_id, k);
            }
        };

        if sub_index.rows.len() < k + 1 {
            return self.knn_by_track(track_id, k);
        }

        Ok(self.knn_over_rows(row, k, sub_index.rows.iter().copied().filter(|&r| r != row)))
    }

    fn build_cluster_sub_index(&self, label: i32) -> Result<ClusterSubIndex, AudioIndexError> {
        let rows: Vec<usize> = self
            .cluster_labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == label)
            .map(|(row, _)| row)
            .collect();

        if rows.is_empty() {
            return Err(AudioIndexError::IndexBuildFailed {
                cluster: label,
                reason: "no members found for cluster label".to_string(),
            });
        }
        Ok(ClusterSubIndex { rows })
    }

    fn row_of(&self, track_id: TrackId) -> Result<usize, AudioIndexError> {
        self.row_by_track_id.get(&track_id).copied().ok_or(AudioIndexError::NotFound(track_id))
    }

    /// Brute-force Euclidean KNN restricted to `candidate_rows`. Ties break
    /// by ascending row index (§4.3 tie-break policy), which is also the
    /// order candidates are emitted in before the distance-keyed sort, so a
    /// stable sort preserves it.
    fn knn_over_rows(&self, query_row: usize, k: usize, candidate_rows: impl Iterator<Item = usize>) -> Vec<(TrackId, f64)> {
        let query = self.embeddings.row(query_row);

        let mut scored: Vec<(usize, f64)> = candidate_rows
            .map(|row| {
                let candidate = self.embeddings.row(row);
                let distance = query
                    .iter()
                    .zip(candidate.iter())
                    .map(|(a, b)| ((*a - *b) as f64).powi(2))
                    .sum::<f64>()
                    .sqrt();
                (row, distance)
            })
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        scored.into_iter().map(|(row, distance)| (self.track_ids[row], distance)).collect()
    }
}
