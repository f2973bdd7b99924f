use serde::{Deserialize, Serialize};

use crate::family::Family;
use crate::similarity::{Metric, SimilarityMethod};

/// Describes one specific variant (feature engineering + index parameters)
/// within a model family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDescriptor {
    pub family: Family,
    pub name: String,
    pub has_projection: bool,
    pub metric: Metric,
    pub cluster_scoped: bool,
    pub projection_dim: Option<usize>,
    pub min_cluster_size: Option<usize>,
    pub similarity_method: SimilarityMethod,
}

impl VariantDescriptor {
    /// A stable identifier suitable for cache-key fingerprinting.
    pub fn variant_id(&self) -> String {
        format!("{}:{}", self.family, self.name)
    }
}
