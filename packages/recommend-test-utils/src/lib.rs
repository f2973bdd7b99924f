//! Synthetic fixture builders shared by `recommend-*` crate tests: track
//! ids, track records, and on-disk model artifact directories that
//! `resonance_recommend_artifacts::load` accepts.
//!
//! Grounded on `recommend-artifacts`'s own `#[cfg(test)]` seed helpers,
//! generalized here so every downstream crate can build the same fixtures
//! instead of re-deriving the artifact file formats ad hoc in each test
//! module.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use resonance_recommend_artifacts::{
    DenseMatrixFile, IntVectorFile, LyricsTrainingMetadataFile, LyricsVectorizerFile, SongIndicesFile, SparseMatrixFile,
};
use resonance_recommend_types::{AudioFeatureSummary, TrackId, TrackRecord};
use tempfile::TempDir;

/// The `i`th synthetic track id: a 22-byte id with `i` in its first byte, so
/// ids stay distinct and sort predictably for `i < 256`.
pub fn track_id(i: u8) -> TrackId {
    let mut bytes = [0u8; 22];
    bytes[0] = i;
    TrackId::from_bytes(bytes)
}

/// A minimal but fully-populated `TrackRecord` for track `i`, attributed to
/// `artist_id` with the given `popularity`. Every optional field is `Some`/
/// populated rather than `None` so filter and enrichment tests exercise the
/// full struct by default.
pub fn sample_track_record(i: u8, artist_id: &str, popularity: u8) -> TrackRecord {
    TrackRecord {
        id: track_id(i),
        name: format!("Track {i}"),
        artist_name: format!("Artist {artist_id}"),
        artist_id: artist_id.to_string(),
        album_name: Some(format!("Album {i}")),
        duration_ms: 200_000,
        popularity,
        key: (i % 12) as u8,
        mode: 1,
        tempo: 120.0,
        year: Some(2020),
        preview_url: None,
        album_image_url: None,
        audio_feature_summary: AudioFeatureSummary::default(),
        lyrics: Some(format!("sample lyrics for track {i}")),
    }
}

fn write_bincode<T: serde::Serialize>(path: &Path, value: &T) {
    let file = File::create(path).unwrap();
    bincode::serialize_into(BufWriter::new(file), value).unwrap();
}

fn write_json(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

fn raw_track_ids(n: usize) -> Vec<[u8; 22]> {
    (0..n)
        .map(|i| {
            let mut bytes = [0u8; 22];
            bytes[0] = i as u8;
            bytes
        })
        .collect()
}

/// Builds a temporary `MODELS_PATH`-shaped directory and seeds it with an
/// audio and/or a lyrics variant. Returned `TempDir` must be kept alive for
/// as long as the directory is read (e.g. passed to
/// `resonance_recommend_artifacts::load`).
pub struct ModelsDirBuilder {
    dir: TempDir,
}

impl ModelsDirBuilder {
    pub fn new() -> Self {
        Self { dir: TempDir::new().expect("create temp models dir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Seeds an audio variant named `name` with `n` tracks embedded in `d`
    /// dimensions, placed on a line spaced `spacing` apart per dimension:
    /// point `i` sits at `(i*spacing, ..., i*spacing)`. Nearest-neighbor
    /// order under Euclidean distance is then just ascending `|i - j|`,
    /// which keeps strategy tests' expected orderings obvious.
    pub fn with_audio_variant(self, name: &str, n: usize, d: usize, spacing: f32) -> Self {
        let data: Vec<f32> = (0..n).flat_map(|i| std::iter::repeat(i as f32 * spacing).take(d)).collect();

        write_json(
            &self.dir.path().join(format!("hdbscan_config_{name}.json")),
            r#"{"min_cluster_size": 2, "metric": "euclidean", "cluster_based": false}"#,
        );
        write_bincode(
            &self.dir.path().join(format!("{name}_audio_embeddings.bin")),
            &DenseMatrixFile { rows: n, cols: d, data },
        );
        write_bincode(
            &self.dir.path().join(format!("{name}_cluster_labels.bin")),
            &IntVectorFile { values: vec![0; n] },
        );
        write_bincode(
            &self.dir.path().join(format!("{name}_song_indices.bin")),
            &SongIndicesFile { track_ids: raw_track_ids(n), names: None, artists: None },
        );
        self
    }

    /// Seeds a lyrics variant named `name` sharing one vocabulary of
    /// `vocab_terms` single-character terms, with `n` training tracks each
    /// holding term `i % vocab_terms` at weight `1.0` in a raw (non-SVD)
    /// TF-IDF space.
    pub fn with_lyrics_variant(self, name: &str, vocab_terms: usize, n: usize) -> Self {
        self.write_shared_lyrics_vectorizer(vocab_terms);
        self.write_shared_lyrics_metadata(n);

        write_json(
            &self.dir.path().join(format!("lyrics_config_{name}.json")),
            r#"{"has_svd": false, "n_neighbors": 10, "metric": "cosine"}"#,
        );

        let row_ptr: Vec<u32> = (0..=n as u32).collect();
        let col_idx: Vec<u32> = (0..n).map(|i| (i % vocab_terms) as u32).collect();
        let values = vec![1.0f32; n];
        write_bincode(
            &self.dir.path().join(format!("lyrics_similarity_model_{name}.bin")),
            &SparseMatrixFile { rows: n, cols: vocab_terms, row_ptr, col_idx, values },
        );
        self
    }

    fn write_shared_lyrics_vectorizer(&self, vocab_terms: usize) {
        let path = self.dir.path().join("lyrics_tfidf_vectorizer.bin");
        if path.is_file() {
            return;
        }
        let vocabulary: Vec<(String, u32)> =
            (0..vocab_terms).map(|i| (char::from(b'a' + i as u8).to_string(), i as u32)).collect();
        write_bincode(&path, &LyricsVectorizerFile { vocabulary, idf: vec![1.0; vocab_terms], ngram_min: 1, ngram_max: 1 });
    }

    fn write_shared_lyrics_metadata(&self, n: usize) {
        let path = self.dir.path().join("lyrics_training_metadata.bin");
        if path.is_file() {
            return;
        }
        write_bincode(
            &path,
            &LyricsTrainingMetadataFile {
                training_songs: raw_track_ids(n),
                case_fold: true,
                strip_non_alpha: true,
                lemmatize: false,
                stopword_set: Vec::new(),
                min_token_length: 1,
            },
        );
    }
}

impl Default for ModelsDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}
