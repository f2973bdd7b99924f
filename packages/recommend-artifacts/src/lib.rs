//! Loads offline-prepared model artifacts (audio embeddings, cluster labels,
//! the lyrics TF-IDF vectorizer, and their per-variant configuration) from a
//! `MODELS_PATH` directory into the in-memory structures the rest of the
//! engine builds its indices from.

mod error;
mod file_formats;
mod loader;
mod types;

pub use error::{ArtifactError, ArtifactResult, LoadError};
pub use file_formats::{
    AudioConfigFile, DenseMatrixFile, IntVectorFile, LyricsConfigFile, LyricsTrainingMetadataFile,
    LyricsVectorizerFile, SongIndicesFile, SparseMatrixFile,
};
pub use loader::load;
pub use types::{
    AudioVariantArtifacts, LoadReport, LyricsTrainingSpace, LyricsVariantArtifacts, LyricsVectorizer,
};

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::BufWriter;
    use std::path::Path;

    use resonance_recommend_types::TrackId;
    use tempfile::TempDir;

    use crate::file_formats::{DenseMatrixFile, IntVectorFile, LyricsTrainingMetadataFile, LyricsVectorizerFile, SongIndicesFile, SparseMatrixFile};

    fn write_bincode<T: serde::Serialize>(path: &Path, value: &T) {
        let file = File::create(path).unwrap();
        bincode::serialize_into(BufWriter::new(file), value).unwrap();
    }

    fn write_json(path: &Path, contents: &str) {
        std::fs::write(path, contents).unwrap();
    }

    fn track_ids(n: usize) -> Vec<[u8; 22]> {
        (0..n)
            .map(|i| {
                let mut bytes = [0u8; 22];
                bytes[0] = i as u8;
                bytes
            })
            .collect()
    }

    fn seed_audio_variant(dir: &Path, name: &str, n: usize, d: usize) {
        write_json(
            &dir.join(format!("hdbscan_config_{name}.json")),
            r#"{"min_cluster_size": 5, "metric": "euclidean", "cluster_based": true}"#,
        );
        write_bincode(
            &dir.join(format!("{name}_audio_embeddings.bin")),
            &DenseMatrixFile { rows: n, cols: d, data: vec![0.1; n * d] },
        );
        write_bincode(
            &dir.join(format!("{name}_cluster_labels.bin")),
            &IntVectorFile { values: vec![0; n] },
        );
        write_bincode(
            &dir.join(format!("{name}_song_indices.bin")),
            &SongIndicesFile { track_ids: track_ids(n), names: None, artists: None },
        );
    }

    #[test]
    fn loads_a_well_formed_audio_variant() {
        let dir = TempDir::new().unwrap();
        seed_audio_variant(dir.path(), "v1", 4, 8);

        let report = crate::load(dir.path()).unwrap();
        assert_eq!(report.audio_variants.len(), 1);
        let variant = &report.audio_variants[0];
        assert_eq!(variant.descriptor.name, "v1");
        assert_eq!(variant.track_ids.len(), 4);
        assert_eq!(variant.embeddings.rows, 4);
        assert!(!variant.had_precomputed_knn);
    }

    #[test]
    fn falls_back_to_base_files_when_per_variant_file_missing() {
        let dir = TempDir::new().unwrap();
        write_json(
            &dir.path().join("hdbscan_config_v1.json"),
            r#"{"min_cluster_size": 5, "metric": "euclidean", "cluster_based": true}"#,
        );
        // no v1_audio_embeddings.bin: must fall back to the base file
        write_bincode(
            &dir.path().join("audio_embeddings.bin"),
            &DenseMatrixFile { rows: 2, cols: 3, data: vec![1.0; 6] },
        );
        write_bincode(&dir.path().join("v1_cluster_labels.bin"), &IntVectorFile { values: vec![0, 1] });
        write_bincode(
            &dir.path().join("v1_song_indices.bin"),
            &SongIndicesFile { track_ids: track_ids(2), names: None, artists: None },
        );

        let report = crate::load(dir.path()).unwrap();
        assert_eq!(report.audio_variants.len(), 1);
        assert_eq!(report.audio_variants[0].embeddings.rows, 2);
    }

    #[test]
    fn rejects_one_bad_variant_while_sibling_loads() {
        let dir = TempDir::new().unwrap();
        seed_audio_variant(dir.path(), "good", 3, 4);

        // "bad" variant's embeddings row count disagrees with its song indices
        write_json(
            &dir.path().join("hdbscan_config_bad.json"),
            r#"{"min_cluster_size": 5, "metric": "euclidean", "cluster_based": true}"#,
        );
        write_bincode(
            &dir.path().join("bad_audio_embeddings.bin"),
            &DenseMatrixFile { rows: 3, cols: 4, data: vec![0.0; 12] },
        );
        write_bincode(&dir.path().join("bad_cluster_labels.bin"), &IntVectorFile { values: vec![0; 3] });
        write_bincode(
            &dir.path().join("bad_song_indices.bin"),
            &SongIndicesFile { track_ids: track_ids(5), names: None, artists: None },
        );

        let report = crate::load(dir.path()).unwrap();
        assert_eq!(report.audio_variants.len(), 1);
        assert_eq!(report.audio_variants[0].descriptor.name, "good");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].variant, "bad");
    }

    #[test]
    fn rejects_duplicate_track_ids() {
        let dir = TempDir::new().unwrap();
        write_json(
            &dir.path().join("hdbscan_config_v1.json"),
            r#"{"min_cluster_size": 5, "metric": "euclidean", "cluster_based": true}"#,
        );
        write_bincode(
            &dir.path().join("v1_audio_embeddings.bin"),
            &DenseMatrixFile { rows: 2, cols: 2, data: vec![0.0; 4] },
        );
        write_bincode(&dir.path().join("v1_cluster_labels.bin"), &IntVectorFile { values: vec![0, 0] });
        write_bincode(
            &dir.path().join("v1_song_indices.bin"),
            &SongIndicesFile { track_ids: vec![[1u8; 22], [1u8; 22]], names: None, artists: None },
        );

        let report = crate::load(dir.path()).unwrap();
        assert!(report.audio_variants.is_empty());
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn loads_lyrics_variant_without_projection() {
        let dir = TempDir::new().unwrap();
        write_bincode(
            &dir.path().join("lyrics_tfidf_vectorizer.bin"),
            &LyricsVectorizerFile {
                vocabulary: vec![("love".to_string(), 0), ("night".to_string(), 1)],
                idf: vec![1.2, 0.8],
                ngram_min: 1,
                ngram_max: 1,
            },
        );
        write_bincode(
            &dir.path().join("lyrics_training_metadata.bin"),
            &LyricsTrainingMetadataFile {
                training_songs: track_ids(2),
                case_fold: true,
                strip_non_alpha: true,
                lemmatize: true,
                stopword_set: vec!["the".to_string()],
                min_token_length: 3,
            },
        );
        write_json(
            &dir.path().join("lyrics_config_v1.json"),
            r#"{"has_svd": false, "n_neighbors": 10, "metric": "cosine"}"#,
        );
        write_bincode(
            &dir.path().join("lyrics_similarity_model_v1.bin"),
            &SparseMatrixFile { rows: 2, cols: 2, row_ptr: vec![0, 1, 2], col_idx: vec![0, 1], values: vec![0.5, 0.3] },
        );

        let report = crate::load(dir.path()).unwrap();
        assert_eq!(report.lyrics_variants.len(), 1);
        assert!(report.lyrics_vectorizer.is_some());
        assert_eq!(report.lyrics_vectorizer.unwrap().dim, 2);
    }

    #[test]
    fn missing_models_dir_is_reported_clearly() {
        let result = crate::load(Path::new("/nonexistent/models/path"));
        assert!(matches!(result, Err(crate::LoadError::ModelsDirUnreadable(_))));
    }

    #[test]
    fn empty_directory_yields_no_usable_variants_error() {
        let dir = TempDir::new().unwrap();
        let result = crate::load(dir.path());
        assert!(matches!(result, Err(crate::LoadError::NoUsableVariants { .. })));
    }

    #[test]
    fn track_id_round_trips_through_song_indices_file() {
        let id = TrackId::from_bytes([9u8; 22]);
        assert_eq!(*id.as_bytes(), [9u8; 22]);
    }
}
