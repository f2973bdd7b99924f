//! Sparse-text and dimensionality-reduced nearest-neighbor search over
//! track lyrics (§4.4).

mod distance;
mod error;
mod lemmatizer;
mod preprocessing;
mod vectorize;

use std::sync::Arc;

use resonance_recommend_artifacts::{LyricsTrainingSpace, LyricsVariantArtifacts, LyricsVectorizer};
use resonance_recommend_track_lookup::TrackLookup;
use resonance_recommend_types::{PreprocessingRecipe, TrackId, VariantDescriptor};
use tracing::instrument;

pub use error::LyricsIndexError;
pub use preprocessing::preprocess;

/// One loaded lyrics variant, ready to answer queries against the shared
/// TF-IDF vectorizer.
pub struct LyricsIndex {
    descriptor: VariantDescriptor,
    training_space: LyricsTrainingSpace,
    training_songs: Vec<TrackId>,
    preprocessing: PreprocessingRecipe,
    default_k: usize,
    vectorizer: Arc<LyricsVectorizer>,
}

impl LyricsIndex {
    pub fn build(artifacts: LyricsVariantArtifacts, vectorizer: Arc<LyricsVectorizer>) -> Self {
        Self {
            descriptor: artifacts.descriptor,
            training_space: artifacts.training_space,
            training_songs: artifacts.training_songs,
            preprocessing: artifacts.preprocessing,
            default_k: artifacts.default_k,
            vectorizer,
        }
    }

    pub fn descriptor(&self) -> &VariantDescriptor {
        &self.descriptor
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// Preprocesses, vectorizes, and searches raw lyrics text for the `k`
    /// nearest training songs. Distances are returned raw; C2 normalizes.
    #[instrument(skip(self, text), fields(variant = %self.descriptor.name))]
    pub fn knn_by_lyrics(&self, text: &str, k: usize) -> Result<Vec<(TrackId, f64)>, LyricsIndexError> {
        let cleaned = preprocessing::preprocess(text, &self.preprocessing)?;
        let query = vectorize::vectorize(&cleaned, &self.vectorizer);
        let metric = self.descriptor.metric;

        let mut scored: Vec<(usize, f64)> = match &self.training_space {
            LyricsTrainingSpace::RawTfidf(raw) => (0..raw.rows)
                .map(|row| (row, distance::sparse_distance(&query, raw.row(row), metric)))
                .collect(),
            LyricsTrainingSpace::Reduced { projection, reduced_training } => {
                let query_dense = project(&query, projection);
                (0..reduced_training.rows)
                    .map(|row| (row, distance::dense_distance(&query_dense, reduced_training.row(row), metric)))
                    .collect()
            }
        };

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        Ok(scored.into_iter().map(|(row, distance)| (self.training_songs[row], distance)).collect())
    }

    /// Looks up the seed track's stored lyrics via the host catalog, then
    /// delegates to `knn_by_lyrics`.
    pub async fn knn_by_track(
        &self,
        track_id: TrackId,
        k: usize,
        lookup: &dyn TrackLookup,
    ) -> Result<Vec<(TrackId, f64)>, LyricsIndexError> {
        let found = lookup.lookup(&[track_id]).await;
        let record = found.get(&track_id).ok_or(LyricsIndexError::TrackNotFound(track_id))?;
        let lyrics = record.lyrics.as_deref().ok_or(LyricsIndexError::TrackHasNoLyrics(track_id))?;
        self.knn_by_lyrics(lyrics, k)
    }
}

/// Applies the SVD-style projection matrix (`V x K`, row per input
/// dimension) to a sparse query vector, touching only the rows for the
/// query's nonzero dimensions.
fn project(query: &vectorize::SparseVector, projection: &resonance_recommend_artifacts::DenseMatrixFile) -> Vec<f32> {
    let mut out = vec![0.0f32; projection.cols];
    for &(col, weight) in &query.entries {
        if (col as usize) >= projection.rows {
            continue;
        }
        let row = projection.row(col as usize);
        for (o, r) in out.iter_mut().zip(row.iter()) {
            *o += weight * r;
        }
    }
    out
}
