//! Cache-key derivation (§4.8): a stable fingerprint of everything a
//! strategy's output actually depends on, so two requests that would
//! produce the same answer hash to the same key.

use std::hash::{Hash, Hasher};

use resonance_recommend_types::{FilterSpec, Request, Strategy, TrackId};

/// Opaque, hashable, comparable cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(u64);

/// Builds the fingerprint described in §4.8: sorted seed ids, strategy, k,
/// the filter spec's canonical string, and the active variant id for every
/// family the strategy reads from.
pub fn fingerprint(request: &Request, filters: &FilterSpec, active_variant_ids: &[&str]) -> CacheKey {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();

    let seeds = request.normalized_seed_ids();
    seeds.len().hash(&mut hasher);
    for seed in &seeds {
        hash_track_id(seed, &mut hasher);
    }

    request.strategy.as_str().hash(&mut hasher);
    request.k.hash(&mut hasher);
    filters.canonical().hash(&mut hasher);

    for variant_id in active_variant_ids {
        variant_id.hash(&mut hasher);
    }

    CacheKey(hasher.finish())
}

fn hash_track_id(track_id: &TrackId, hasher: &mut impl Hasher) {
    track_id.as_bytes().hash(hasher);
}

/// Which families a strategy reads from, and so which active variant ids
/// must be folded into its cache key (a `switch` on a family a strategy
/// doesn't touch must not invalidate its cached results).
pub fn families_for(strategy: Strategy) -> &'static [resonance_recommend_types::Family] {
    use resonance_recommend_types::Family;
    match strategy {
        Strategy::Cluster | Strategy::HdbscanKnn => &[Family::Audio],
        Strategy::Lyrics => &[Family::Lyrics, Family::Audio],
        Strategy::ArtistBased | Strategy::GenreBased | Strategy::Global => &[],
        Strategy::Hybrid => &[Family::Audio],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_recommend_types::FilterSpec;

    fn track(i: u8) -> TrackId {
        let mut bytes = [0u8; 22];
        bytes[0] = i;
        TrackId::from_bytes(bytes)
    }

    fn request(seed_ids: Vec<TrackId>, strategy: Strategy) -> Request {
        Request {
            seed_ids,
            k: 5,
            strategy,
            variant: None,
            filters: None,
            diversity_seed: None,
        }
    }

    #[test]
    fn seed_order_does_not_affect_the_key() {
        let a = request(vec![track(1), track(2)], Strategy::Cluster);
        let b = request(vec![track(2), track(1)], Strategy::Cluster);
        let filters = FilterSpec::default();
        assert_eq!(fingerprint(&a, &filters, &["audio:v1"]), fingerprint(&b, &filters, &["audio:v1"]));
    }

    #[test]
    fn a_different_active_variant_changes_the_key() {
        let req = request(vec![track(1)], Strategy::Cluster);
        let filters = FilterSpec::default();
        let k1 = fingerprint(&req, &filters, &["audio:v1"]);
        let k2 = fingerprint(&req, &filters, &["audio:v2"]);
        assert_ne!(k1, k2);
    }

    #[test]
    fn a_different_filter_changes_the_key() {
        let req = request(vec![track(1)], Strategy::Global);
        let plain = FilterSpec::default();
        let filtered = FilterSpec { min_popularity: Some(80), ..Default::default() };
        assert_ne!(fingerprint(&req, &plain, &[]), fingerprint(&req, &filtered, &[]));
    }

    #[test]
    fn artist_and_genre_and_global_strategies_do_not_depend_on_any_family() {
        assert!(families_for(Strategy::ArtistBased).is_empty());
        assert!(families_for(Strategy::GenreBased).is_empty());
        assert!(families_for(Strategy::Global).is_empty());
    }
}
