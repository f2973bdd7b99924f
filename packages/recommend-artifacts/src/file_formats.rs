//! On-disk container formats for the binary artifacts under `MODELS_PATH`.
//!
//! The `<ext>` the spec calls "a self-describing binary serialization" is
//! `bincode` over these `serde`-derived structs: the shape and row ordering
//! the spec fixes survive round-trip, while the exact byte layout is this
//! crate's own implementation detail.

use serde::{Deserialize, Serialize};

/// Row-major dense `rows x cols` matrix of `f32`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseMatrixFile {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f32>,
}

impl DenseMatrixFile {
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
}

/// Sparse `rows x cols` matrix in CSR layout, used for raw TF-IDF training
/// vectors (the lyrics "similarity model" when no SVD projection applies).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparseMatrixFile {
    pub rows: usize,
    pub cols: usize,
    pub row_ptr: Vec<u32>,
    pub col_idx: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseMatrixFile {
    pub fn row(&self, i: usize) -> impl Iterator<Item = (u32, f32)> + '_ {
        let start = self.row_ptr[i] as usize;
        let end = self.row_ptr[i + 1] as usize;
        self.col_idx[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntVectorFile {
    pub values: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongIndicesFile {
    pub track_ids: Vec<[u8; 22]>,
    pub names: Option<Vec<String>>,
    pub artists: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsVectorizerFile {
    /// term -> column index
    pub vocabulary: Vec<(String, u32)>,
    /// idf weight per column, `idf.len() == vocabulary size`
    pub idf: Vec<f32>,
    pub ngram_min: usize,
    pub ngram_max: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsTrainingMetadataFile {
    pub training_songs: Vec<[u8; 22]>,
    pub case_fold: bool,
    pub strip_non_alpha: bool,
    pub lemmatize: bool,
    pub stopword_set: Vec<String>,
    pub min_token_length: usize,
}

/// `hdbscan_config_<name>.json` — recognized keys only; unknown keys ignored
/// by `serde`'s default (non-`deny_unknown_fields`) behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfigFile {
    #[serde(default)]
    pub approach: Option<String>,
    #[serde(default)]
    pub feature_type: Option<String>,
    #[serde(default)]
    pub has_pca: bool,
    #[serde(default)]
    pub pca_components: Option<usize>,
    #[serde(default)]
    pub has_scaler: bool,
    #[serde(default = "default_true")]
    pub cluster_based: bool,
    pub min_cluster_size: usize,
    #[serde(default)]
    pub min_samples: Option<usize>,
    #[serde(default = "default_euclidean")]
    pub metric: String,
    #[serde(default)]
    pub cluster_selection_method: Option<String>,
}

/// `lyrics_config_<name>.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct LyricsConfigFile {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub has_svd: bool,
    #[serde(default)]
    pub n_components: Option<usize>,
    #[serde(default = "default_k")]
    pub n_neighbors: usize,
    #[serde(default = "default_cosine")]
    pub metric: String,
}

fn default_true() -> bool {
    true
}
fn default_euclidean() -> String {
    "euclidean".to_string()
}
fn default_cosine() -> String {
    "cosine".to_string()
}
fn default_k() -> usize {
    10
}
