//! Holds every loaded variant for one model family and hot-swaps which one
//! answers subsequent queries (§4.5).
//!
//! `switch` replaces a pointer behind a `RwLock`; a query acquires its own
//! `Arc` clone at entry and holds it for the query's duration, so a variant
//! being replaced is simply dropped once the last in-flight query using it
//! finishes — no query is interrupted, and a query that began before
//! `switch` returns is free to complete under the old variant (§4.5
//! ordering contract).

mod error;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use resonance_recommend_audio_index::AudioIndex;
use resonance_recommend_lyrics_index::LyricsIndex;
use resonance_recommend_types::VariantDescriptor;
use tracing::info;

pub use error::RegistryError;

/// Anything a registry can hold an active pointer to.
pub trait Variant {
    fn descriptor(&self) -> &VariantDescriptor;
}

impl Variant for AudioIndex {
    fn descriptor(&self) -> &VariantDescriptor {
        AudioIndex::descriptor(self)
    }
}

impl Variant for LyricsIndex {
    fn descriptor(&self) -> &VariantDescriptor {
        LyricsIndex::descriptor(self)
    }
}

/// A single-family registry: every loaded variant, plus which one is active.
pub struct FamilyRegistry<T: Variant> {
    variants: HashMap<String, Arc<T>>,
    active: RwLock<Arc<T>>,
}

impl<T: Variant> FamilyRegistry<T> {
    /// Builds a registry from every loaded variant, with `initial_active`
    /// selected as the starting active variant. Panics if `variants` is
    /// empty or doesn't contain `initial_active` — construction happens
    /// once at startup/switch-time, after the caller has already confirmed
    /// at least one variant loaded (§4.1's `NoUsableVariants` is the
    /// caller's responsibility to check first).
    pub fn new(variants: Vec<Arc<T>>, initial_active: &str) -> Self {
        let by_name: HashMap<String, Arc<T>> =
            variants.into_iter().map(|v| (v.descriptor().name.clone(), v)).collect();

        let active = by_name
            .get(initial_active)
            .cloned()
            .or_else(|| by_name.values().next().cloned())
            .expect("FamilyRegistry requires at least one variant");

        Self { variants: by_name, active: RwLock::new(active) }
    }

    pub fn list_variants(&self) -> Vec<VariantDescriptor> {
        self.variants.values().map(|v| v.descriptor().clone()).collect()
    }

    /// Returns a clone of a specific variant by name, regardless of which
    /// one is currently active. Used when a request pins `variant` rather
    /// than taking whatever is active.
    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.variants.get(name).cloned()
    }

    /// Returns a clone of the currently active handle. The caller's clone
    /// keeps the underlying variant alive for the duration of its query
    /// even if `switch` replaces the registry's own pointer concurrently.
    pub fn active(&self) -> Arc<T> {
        self.active.read().unwrap().clone()
    }

    /// Atomically swaps the active pointer, returning the prior variant's
    /// name. In-flight queries holding the old `Arc` keep it alive until
    /// they finish; this function never blocks on them.
    pub fn switch(&self, name: &str) -> Result<String, RegistryError> {
        let next = self.variants.get(name).cloned().ok_or_else(|| RegistryError::UnknownVariant(name.to_string()))?;

        let mut active = self.active.write().unwrap();
        let prior_name = active.descriptor().name.clone();
        *active = next;
        info!(from = %prior_name, to = name, "switched active variant");
        Ok(prior_name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap as StdHashMap;

    use resonance_recommend_artifacts::{AudioVariantArtifacts, DenseMatrixFile};
    use resonance_recommend_types::{Family, Metric, SimilarityMethod, TrackId};

    use super::*;

    fn track(i: u8) -> TrackId {
        let mut bytes = [0u8; 22];
        bytes[0] = i;
        TrackId::from_bytes(bytes)
    }

    fn audio_variant(name: &str) -> Arc<AudioIndex> {
        let track_ids = vec![track(0), track(1)];
        let row_by_track_id: StdHashMap<TrackId, usize> = track_ids.iter().enumerate().map(|(r, t)| (*t, r)).collect();
        let descriptor = VariantDescriptor {
            family: Family::Audio,
            name: name.to_string(),
            has_projection: false,
            metric: Metric::Euclidean,
            cluster_scoped: false,
            projection_dim: None,
            min_cluster_size: None,
            similarity_method: SimilarityMethod::Exponential,
        };
        let artifacts = AudioVariantArtifacts {
            descriptor,
            embeddings: DenseMatrixFile { rows: 2, cols: 2, data: vec![0.0, 0.0, 1.0, 1.0] },
            cluster_labels: vec![0, 0],
            track_ids,
            row_by_track_id,
            had_precomputed_knn: false,
        };
        Arc::new(AudioIndex::build(artifacts, None))
    }

    #[test]
    fn active_defaults_to_requested_initial_variant() {
        let registry = FamilyRegistry::new(vec![audio_variant("a"), audio_variant("b")], "b");
        assert_eq!(registry.active().descriptor().name, "b");
    }

    #[test]
    fn switch_updates_active_and_reports_prior() {
        let registry = FamilyRegistry::new(vec![audio_variant("a"), audio_variant("b")], "a");
        let prior = registry.switch("b").unwrap();
        assert_eq!(prior, "a");
        assert_eq!(registry.active().descriptor().name, "b");
    }

    #[test]
    fn switch_to_unknown_variant_is_rejected() {
        let registry = FamilyRegistry::new(vec![audio_variant("a")], "a");
        let err = registry.switch("missing").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownVariant(_)));
    }

    #[test]
    fn in_flight_handle_survives_a_switch() {
        let registry = FamilyRegistry::new(vec![audio_variant("a"), audio_variant("b")], "a");
        let held = registry.active();
        registry.switch("b").unwrap();
        assert_eq!(held.descriptor().name, "a");
        assert_eq!(registry.active().descriptor().name, "b");
    }

    #[test]
    fn get_returns_a_pinned_variant_without_touching_active() {
        let registry = FamilyRegistry::new(vec![audio_variant("a"), audio_variant("b")], "a");
        let pinned = registry.get("b").unwrap();
        assert_eq!(pinned.descriptor().name, "b");
        assert_eq!(registry.active().descriptor().name, "a");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn list_variants_reports_every_loaded_variant() {
        let registry = FamilyRegistry::new(vec![audio_variant("a"), audio_variant("b")], "a");
        let mut names: Vec<String> = registry.list_variants().into_iter().map(|d| d.name).collect();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
