use serde::{Deserialize, Serialize};

/// Distance-to-similarity conversion method, recorded per `VariantDescriptor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    Exponential,
    Inverse,
    Gaussian,
    Linear,
}

impl SimilarityMethod {
    /// Default method for a model/feature type combination, mirroring the
    /// offline pipeline's `get_optimal_similarity_method`. Used by the
    /// artifact loader when a variant's config doesn't pin a method.
    pub fn default_for(model_type: &str, metric: Metric) -> Self {
        match model_type.to_ascii_lowercase().as_str() {
            "hdbscan" | "knn" | "euclidean" => SimilarityMethod::Exponential,
            "lyrics" | "svd" => SimilarityMethod::Inverse,
            "cosine" => SimilarityMethod::Linear,
            _ => match metric {
                Metric::Cosine => SimilarityMethod::Linear,
                Metric::Euclidean => SimilarityMethod::Exponential,
            },
        }
    }
}

/// Distance metric a neighbor index was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Cosine,
    Euclidean,
}
