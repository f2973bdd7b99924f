//! Discovers and loads the artifact set under `MODELS_PATH` (§4.1, §6).

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use resonance_recommend_types::{Family, Metric, PreprocessingRecipe, SimilarityMethod, TrackId, VariantDescriptor};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{ArtifactError, LoadError};
use crate::file_formats::{
    AudioConfigFile, DenseMatrixFile, IntVectorFile, LyricsConfigFile, LyricsTrainingMetadataFile,
    LyricsVectorizerFile, SongIndicesFile, SparseMatrixFile,
};
use crate::types::{AudioVariantArtifacts, LoadReport, LyricsTrainingSpace, LyricsVariantArtifacts, LyricsVectorizer};

/// Loads every audio and lyrics variant found under `models_dir`, rejecting
/// individual bad variants rather than failing the whole load (§4.1).
pub fn load(models_dir: &Path) -> Result<LoadReport, LoadError> {
    if !models_dir.is_dir() {
        return Err(LoadError::ModelsDirUnreadable(models_dir.display().to_string()));
    }

    let mut report = LoadReport::default();

    for name in discover_variant_names(models_dir, "hdbscan_config_") {
        match load_audio_variant(models_dir, &name) {
            Ok(variant) => {
                info!(variant = %name, "loaded audio variant");
                report.audio_variants.push(variant);
            }
            Err(e) => {
                warn!(variant = %name, error = %e, "rejecting audio variant");
                report.failures.push(e);
            }
        }
    }

    let lyrics_names = discover_variant_names(models_dir, "lyrics_config_");
    if !lyrics_names.is_empty() {
        match load_lyrics_vectorizer(models_dir) {
            Ok(vectorizer) => {
                for name in lyrics_names {
                    match load_lyrics_variant(models_dir, &name) {
                        Ok(variant) => {
                            info!(variant = %name, "loaded lyrics variant");
                            report.lyrics_variants.push(variant);
                        }
                        Err(e) => {
                            warn!(variant = %name, error = %e, "rejecting lyrics variant");
                            report.failures.push(e);
                        }
                    }
                }
                report.lyrics_vectorizer = Some(vectorizer);
            }
            Err(e) => {
                warn!(error = %e, "no usable lyrics vectorizer; disabling lyrics family entirely");
                report.failures.push(e);
            }
        }
    }

    if !report.is_usable() {
        return Err(LoadError::NoUsableVariants {
            models_dir: models_dir.display().to_string(),
        });
    }

    Ok(report)
}

/// Finds variant names from `<prefix><name>.json` files directly under
/// `models_dir` (non-recursive descent is sufficient but `WalkDir` with
/// `max_depth(1)` tolerates either a flat directory or one level of nesting
/// some deployments use for the base fallback files).
fn discover_variant_names(models_dir: &Path, prefix: &str) -> Vec<String> {
    let mut names = Vec::new();
    for entry in WalkDir::new(models_dir).max_depth(1).into_iter().filter_map(|e| e.ok()) {
        let Some(file_name) = entry.file_name().to_str() else { continue };
        if let Some(rest) = file_name.strip_prefix(prefix) {
            if let Some(name) = rest.strip_suffix(".json") {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    names
}

fn variant_or_base(models_dir: &Path, variant: &str, prefix: &str, suffix: &str) -> (PathBuf, bool) {
    let per_variant = models_dir.join(format!("{prefix}{variant}{suffix}"));
    if per_variant.is_file() {
        return (per_variant, false);
    }
    (models_dir.join(format!("{prefix}{}", suffix.trim_start_matches('_'))), true)
}

fn read_bincode<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    bincode::deserialize_from(BufReader::new(file)).map_err(|e| format!("{}: {e}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| format!("{}: {e}", path.display()))
}

fn load_audio_variant(models_dir: &Path, name: &str) -> Result<AudioVariantArtifacts, ArtifactError> {
    let config_path = models_dir.join(format!("hdbscan_config_{name}.json"));
    let config: AudioConfigFile =
        read_json(&config_path).map_err(|e| ArtifactError::new(name, config_path.display().to_string(), e))?;

    let (embeddings_path, fell_back) = variant_or_base(models_dir, name, "", "_audio_embeddings.bin");
    if fell_back {
        warn!(variant = name, "falling back to base audio_embeddings.bin");
    }
    let embeddings: DenseMatrixFile = read_bincode(&embeddings_path)
        .map_err(|e| ArtifactError::new(name, embeddings_path.display().to_string(), e))?;

    let (labels_path, fell_back) = variant_or_base(models_dir, name, "", "_cluster_labels.bin");
    if fell_back {
        warn!(variant = name, "falling back to base cluster_labels.bin");
    }
    let labels: IntVectorFile =
        read_bincode(&labels_path).map_err(|e| ArtifactError::new(name, labels_path.display().to_string(), e))?;

    let (indices_path, fell_back) = variant_or_base(models_dir, name, "", "_song_indices.bin");
    if fell_back {
        warn!(variant = name, "falling back to base song_indices.bin");
    }
    let indices: SongIndicesFile =
        read_bincode(&indices_path).map_err(|e| ArtifactError::new(name, indices_path.display().to_string(), e))?;

    let (knn_path, _) = variant_or_base(models_dir, name, "", "_knn_model.bin");
    let had_precomputed_knn = knn_path.is_file();
    debug!(variant = name, present = had_precomputed_knn, "precomputed knn artifact checked, not used directly");

    let track_ids: Vec<TrackId> = indices.track_ids.iter().map(|b| TrackId::from_bytes(*b)).collect();

    if track_ids.len() != embeddings.rows || track_ids.len() != labels.values.len() {
        return Err(ArtifactError::new(
            name,
            indices_path.display().to_string(),
            format!(
                "length mismatch: track_ids={} embeddings_rows={} labels={}",
                track_ids.len(),
                embeddings.rows,
                labels.values.len()
            ),
        ));
    }

    let mut row_by_track_id = HashMap::with_capacity(track_ids.len());
    for (row, id) in track_ids.iter().enumerate() {
        if row_by_track_id.insert(*id, row).is_some() {
            return Err(ArtifactError::new(name, indices_path.display().to_string(), format!("duplicate track id {id}")));
        }
    }

    let metric = parse_metric(&config.metric);
    let descriptor = VariantDescriptor {
        family: Family::Audio,
        name: name.to_string(),
        has_projection: config.has_pca,
        metric,
        cluster_scoped: config.cluster_based,
        projection_dim: config.pca_components,
        min_cluster_size: Some(config.min_cluster_size),
        similarity_method: SimilarityMethod::default_for(config.approach.as_deref().unwrap_or("hdbscan"), metric),
    };

    Ok(AudioVariantArtifacts {
        descriptor,
        embeddings,
        cluster_labels: labels.values,
        track_ids,
        row_by_track_id,
        had_precomputed_knn,
    })
}

fn load_lyrics_vectorizer(models_dir: &Path) -> Result<LyricsVectorizer, ArtifactError> {
    let path = models_dir.join("lyrics_tfidf_vectorizer.bin");
    let file: LyricsVectorizerFile =
        read_bincode(&path).map_err(|e| ArtifactError::new("(shared)", path.display().to_string(), e))?;
    let dim = file.vocabulary.len();
    let mut vocabulary = HashMap::with_capacity(dim);
    for (term, col) in file.vocabulary {
        let idf = *file.idf.get(col as usize).ok_or_else(|| {
            ArtifactError::new("(shared)", path.display().to_string(), format!("idf missing for column {col}"))
        })?;
        vocabulary.insert(term, (col, idf));
    }
    Ok(LyricsVectorizer {
        vocabulary,
        dim,
        ngram_min: file.ngram_min,
        ngram_max: file.ngram_max,
    })
}

fn load_lyrics_training_metadata(models_dir: &Path) -> Result<LyricsTrainingMetadataFile, String> {
    read_bincode(&models_dir.join("lyrics_training_metadata.bin"))
}

fn load_lyrics_variant(models_dir: &Path, name: &str) -> Result<LyricsVariantArtifacts, ArtifactError> {
    let config_path = models_dir.join(format!("lyrics_config_{name}.json"));
    let config: LyricsConfigFile =
        read_json(&config_path).map_err(|e| ArtifactError::new(name, config_path.display().to_string(), e))?;

    let metadata = load_lyrics_training_metadata(models_dir)
        .map_err(|e| ArtifactError::new(name, "lyrics_training_metadata.bin".to_string(), e))?;

    let training_songs: Vec<TrackId> = metadata.training_songs.iter().map(|b| TrackId::from_bytes(*b)).collect();
    let preprocessing = PreprocessingRecipe {
        case_fold: metadata.case_fold,
        strip_non_alpha: metadata.strip_non_alpha,
        lemmatize: metadata.lemmatize,
        stopword_set: metadata.stopword_set.into_iter().collect(),
        min_token_length: metadata.min_token_length,
    };

    let training_space = if config.has_svd {
        let projection_path = models_dir.join(format!("lyrics_svd_model_{name}.bin"));
        let projection: DenseMatrixFile = read_bincode(&projection_path)
            .map_err(|e| ArtifactError::new(name, projection_path.display().to_string(), e))?;

        let reduced_path = models_dir.join(format!("lyrics_knn_model_{name}.bin"));
        let reduced_training: DenseMatrixFile = read_bincode(&reduced_path)
            .map_err(|e| ArtifactError::new(name, reduced_path.display().to_string(), e))?;

        if reduced_training.rows != training_songs.len() {
            return Err(ArtifactError::new(
                name,
                reduced_path.display().to_string(),
                format!(
                    "length mismatch: training_songs={} reduced_training_rows={}",
                    training_songs.len(),
                    reduced_training.rows
                ),
            ));
        }
        if projection.cols != reduced_training.cols {
            return Err(ArtifactError::new(
                name,
                projection_path.display().to_string(),
                format!("projection output dim {} != reduced training dim {}", projection.cols, reduced_training.cols),
            ));
        }

        LyricsTrainingSpace::Reduced { projection, reduced_training }
    } else {
        let similarity_path = models_dir.join(format!("lyrics_similarity_model_{name}.bin"));
        let raw: SparseMatrixFile = read_bincode(&similarity_path)
            .map_err(|e| ArtifactError::new(name, similarity_path.display().to_string(), e))?;

        if raw.rows != training_songs.len() {
            return Err(ArtifactError::new(
                name,
                similarity_path.display().to_string(),
                format!("length mismatch: training_songs={} raw_rows={}", training_songs.len(), raw.rows),
            ));
        }
        LyricsTrainingSpace::RawTfidf(raw)
    };

    let mut seen = std::collections::HashSet::with_capacity(training_songs.len());
    for id in &training_songs {
        if !seen.insert(*id) {
            return Err(ArtifactError::new(name, "lyrics_training_metadata.bin".to_string(), format!("duplicate track id {id}")));
        }
    }

    let metric = parse_metric(&config.metric);
    let descriptor = VariantDescriptor {
        family: Family::Lyrics,
        name: name.to_string(),
        has_projection: config.has_svd,
        metric,
        cluster_scoped: false,
        projection_dim: config.n_components,
        min_cluster_size: None,
        similarity_method: SimilarityMethod::default_for(config.model_type.as_deref().unwrap_or("lyrics"), metric),
    };

    Ok(LyricsVariantArtifacts {
        descriptor,
        training_space,
        training_songs,
        preprocessing,
        default_k: config.n_neighbors,
    })
}

fn parse_metric(s: &str) -> Metric {
    match s.to_ascii_lowercase().as_str() {
        "cosine" => Metric::Cosine,
        _ => Metric::Euclidean,
    }
}
