use std::collections::HashMap;

use resonance_recommend_types::{PreprocessingRecipe, TrackId, VariantDescriptor};

use crate::file_formats::{DenseMatrixFile, SparseMatrixFile};

/// Loaded tensors for one accepted audio variant.
pub struct AudioVariantArtifacts {
    pub descriptor: VariantDescriptor,
    pub embeddings: DenseMatrixFile,
    pub cluster_labels: Vec<i32>,
    pub track_ids: Vec<TrackId>,
    pub row_by_track_id: HashMap<TrackId, usize>,
    /// Whether a precomputed `<name>_knn_model` artifact existed at load
    /// time. The audio index always rebuilds its own neighbor structure
    /// from `embeddings` (see DESIGN.md), so this is informational only.
    pub had_precomputed_knn: bool,
}

/// The vector space a lyrics variant's training data lives in.
pub enum LyricsTrainingSpace {
    /// No SVD projection: raw TF-IDF training vectors, CSR sparse.
    RawTfidf(SparseMatrixFile),
    /// SVD-projected dense training vectors, `N x K`.
    Reduced {
        projection: DenseMatrixFile,
        reduced_training: DenseMatrixFile,
    },
}

/// Loaded tensors for one accepted lyrics variant. The TF-IDF vectorizer is
/// shared across all lyrics variants and loaded once (see
/// `LoadReport::lyrics_vectorizer`).
pub struct LyricsVariantArtifacts {
    pub descriptor: VariantDescriptor,
    pub training_space: LyricsTrainingSpace,
    pub training_songs: Vec<TrackId>,
    pub preprocessing: PreprocessingRecipe,
    pub default_k: usize,
}

/// Shared TF-IDF vectorizer: vocabulary term -> (column index, idf weight).
pub struct LyricsVectorizer {
    pub vocabulary: HashMap<String, (u32, f32)>,
    pub dim: usize,
    pub ngram_min: usize,
    pub ngram_max: usize,
}

/// Everything the loader produced from one `MODELS_PATH` directory.
#[derive(Default)]
pub struct LoadReport {
    pub audio_variants: Vec<AudioVariantArtifacts>,
    pub lyrics_variants: Vec<LyricsVariantArtifacts>,
    pub lyrics_vectorizer: Option<LyricsVectorizer>,
    /// One entry per variant that was discovered but failed validation.
    pub failures: Vec<crate::error::ArtifactError>,
}

impl LoadReport {
    pub fn is_usable(&self) -> bool {
        !self.audio_variants.is_empty() || !self.lyrics_variants.is_empty()
    }
}
