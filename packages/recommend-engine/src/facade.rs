//! The public recommendation facade (§4.9): ties C3/C4's indices, C5's
//! registries, C7's strategies, and C8's cache together behind four
//! operations. A strategy only ever returns raw, unranked candidates; this
//! is where every request's filtering, enrichment, and final ordering
//! happens, once, regardless of which strategy produced the candidates.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use resonance_recommend_audio_index::AudioIndex;
use resonance_recommend_lyrics_index::LyricsIndex;
use resonance_recommend_registry::FamilyRegistry;
use resonance_recommend_track_lookup::TrackLookup;
use resonance_recommend_types::{
    Family, FilterSpec, Recommendation, Request, Response, Strategy, TrackId, TrackRecord, VariantDescriptor, VariantIds,
};
use tracing::{instrument, warn};

use crate::cache::ResultCache;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::fingerprint::{families_for, fingerprint};
use crate::strategies;

const SLOW_QUERY_THRESHOLD_MS: u64 = 1000;

pub struct Engine {
    audio: FamilyRegistry<AudioIndex>,
    lyrics: FamilyRegistry<LyricsIndex>,
    lookup: Arc<dyn TrackLookup>,
    cache: ResultCache,
}

impl Engine {
    pub fn new(
        audio: FamilyRegistry<AudioIndex>,
        lyrics: FamilyRegistry<LyricsIndex>,
        lookup: Arc<dyn TrackLookup>,
        config: &EngineConfig,
    ) -> Self {
        Self { audio, lyrics, lookup, cache: ResultCache::new(config.cache_max_entries, config.cache_default_ttl) }
    }

    pub fn list_variants(&self, family: Family) -> Vec<VariantDescriptor> {
        match family {
            Family::Audio => self.audio.list_variants(),
            Family::Lyrics => self.lyrics.list_variants(),
        }
    }

    /// Hot-swaps the active variant for `family` (§4.5), invalidating any
    /// cached result that was computed under the variant switched away
    /// from. A request already in flight on the old variant is unaffected.
    pub fn switch_variant(&self, family: Family, name: &str) -> EngineResult<String> {
        let prior = match family {
            Family::Audio => self.audio.switch(name),
            Family::Lyrics => self.lyrics.switch(name),
        }
        .map_err(|_| EngineError::UnknownVariant(name.to_string(), family))?;

        self.cache.invalidate_dependents(&format!("{family}:{prior}"));
        Ok(prior)
    }

    /// Convenience wrapper for a single-track query: builds a one-seed
    /// request and delegates to [`Engine::recommend`].
    pub async fn similar_by_track(&self, track_id: TrackId, k: u8, strategy: Strategy) -> EngineResult<Response> {
        let request = Request { seed_ids: vec![track_id], k, strategy, variant: None, filters: None, diversity_seed: None };
        self.recommend(request).await
    }

    #[instrument(skip(self, request), fields(strategy = %request.strategy, k = request.k))]
    pub async fn recommend(&self, request: Request) -> EngineResult<Response> {
        let start = Instant::now();

        if request.k == 0 || request.k > Request::MAX_K {
            return Err(EngineError::InvalidK { max: Request::MAX_K, actual: request.k });
        }
        if request.seed_ids.is_empty() {
            return Err(EngineError::NoValidSeeds);
        }

        let k = request.k as usize;
        let filters = request.filters.clone().unwrap_or_default();
        let seeds = request.normalized_seed_ids();

        let audio = self.resolve_audio(&request)?;
        let lyrics = self.resolve_lyrics(&request)?;

        let needed = families_for(request.strategy);
        let mut variant_ids = VariantIds::default();
        let mut depends_on = Vec::new();
        if needed.contains(&Family::Audio) {
            let id = audio.descriptor().variant_id();
            depends_on.push(id.clone());
            variant_ids.audio = Some(id);
        }
        if needed.contains(&Family::Lyrics) {
            let id = lyrics.descriptor().variant_id();
            depends_on.push(id.clone());
            variant_ids.lyrics = Some(id);
        }
        let depends_on_refs: Vec<&str> = depends_on.iter().map(String::as_str).collect();

        let key = fingerprint(&request, &filters, &depends_on_refs);

        let (recommendations, fallback_used) = self
            .cache
            .get_or_build(key, depends_on, None, || async {
                let (mut candidates, resolved_seed_count, fallback_used) =
                    self.dispatch(&request, &seeds, k, &audio, &lyrics).await;

                if resolved_seed_count == 0 {
                    return Err(EngineError::NoValidSeeds);
                }

                let candidate_ids: Vec<TrackId> = candidates.iter().map(|c| c.track_id).collect();
                let records = self.lookup.lookup(&candidate_ids).await;
                candidates.retain(|c| records.contains_key(&c.track_id));

                let seed_records = self.lookup.lookup(&seeds).await;
                let seed_artist_ids: HashSet<String> = seed_records.values().map(|r| r.artist_id.clone()).collect();

                apply_filters(&mut candidates, &filters, &records, &seed_artist_ids);
                sort_and_cap(&mut candidates, &filters, &records);
                candidates.truncate(k);

                Ok((candidates, fallback_used))
            })
            .await?;

        let timing_ms = start.elapsed().as_millis() as u64;
        if timing_ms > SLOW_QUERY_THRESHOLD_MS {
            warn!(timing_ms, strategy = %request.strategy, "recommend query exceeded the slow-query threshold");
        }

        Ok(Response { recommendations, strategy: request.strategy, variant_ids, timing_ms, fallback_used })
    }

    async fn dispatch(
        &self,
        request: &Request,
        seeds: &[TrackId],
        k: usize,
        audio: &AudioIndex,
        lyrics: &LyricsIndex,
    ) -> (Vec<Recommendation>, usize, Option<String>) {
        match request.strategy {
            Strategy::Cluster => {
                let outcome = strategies::cluster::run(audio, seeds, k).await;
                (outcome.recommendations, outcome.resolved_seed_count, None)
            }
            Strategy::HdbscanKnn => {
                let outcome = strategies::hdbscan_knn::run(audio, seeds, k).await;
                (outcome.recommendations, outcome.resolved_seed_count, None)
            }
            Strategy::Lyrics => {
                let outcome = strategies::lyrics::run(lyrics, audio, seeds, k, self.lookup.as_ref()).await;
                (outcome.recommendations, outcome.resolved_seed_count, outcome.fallback_used.map(str::to_string))
            }
            Strategy::ArtistBased => {
                let outcome = strategies::artist_based::run(seeds, self.lookup.as_ref()).await;
                (outcome.recommendations, outcome.resolved_seed_count, None)
            }
            Strategy::GenreBased => {
                let outcome = strategies::genre_based::run(seeds, self.lookup.as_ref()).await;
                (outcome.recommendations, outcome.resolved_seed_count, None)
            }
            Strategy::Global => {
                // The popularity pool isn't keyed off seed identity, so every
                // literal seed id supplied counts as resolved — unlike the
                // other strategies, an unknown seed here doesn't prevent a
                // result, it just fails to exclude anything extra.
                let outcome = strategies::global::run(seeds, request.diversity_seed, self.lookup.as_ref()).await;
                (outcome.recommendations, seeds.len(), None)
            }
            Strategy::Hybrid => {
                let outcome = strategies::hybrid::run(audio, seeds, k, request.diversity_seed, self.lookup.as_ref()).await;
                (outcome.recommendations, outcome.resolved_seed_count, None)
            }
        }
    }

    /// Resolves the audio variant this request should use: a pinned variant
    /// when `request.variant` names one and the strategy reads from the
    /// audio family, otherwise whatever is currently active.
    fn resolve_audio(&self, request: &Request) -> EngineResult<Arc<AudioIndex>> {
        match (&request.variant, primary_family_for(request.strategy)) {
            (Some(name), Some(Family::Audio)) => {
                self.audio.get(name).ok_or_else(|| EngineError::UnknownVariant(name.clone(), Family::Audio))
            }
            _ => Ok(self.audio.active()),
        }
    }

    fn resolve_lyrics(&self, request: &Request) -> EngineResult<Arc<LyricsIndex>> {
        match (&request.variant, primary_family_for(request.strategy)) {
            (Some(name), Some(Family::Lyrics)) => {
                self.lyrics.get(name).ok_or_else(|| EngineError::UnknownVariant(name.clone(), Family::Lyrics))
            }
            _ => Ok(self.lyrics.active()),
        }
    }
}

/// Which family a request's `variant` pin applies to, given its strategy.
/// Strategies that don't read a family ignore the pin entirely.
fn primary_family_for(strategy: Strategy) -> Option<Family> {
    match strategy {
        Strategy::Cluster | Strategy::HdbscanKnn | Strategy::Hybrid => Some(Family::Audio),
        Strategy::Lyrics => Some(Family::Lyrics),
        Strategy::ArtistBased | Strategy::GenreBased | Strategy::Global => None,
    }
}

fn apply_filters(
    candidates: &mut Vec<Recommendation>,
    filters: &FilterSpec,
    records: &HashMap<TrackId, TrackRecord>,
    seed_artist_ids: &HashSet<String>,
) {
    candidates.retain(|c| {
        let Some(record) = records.get(&c.track_id) else { return false };

        if filters.exclude_ids.contains(&c.track_id) {
            return false;
        }
        if let Some((min_year, max_year)) = filters.year_range {
            if !matches!(record.year, Some(year) if (min_year..=max_year).contains(&year)) {
                return false;
            }
        }
        if let Some(min_popularity) = filters.min_popularity {
            if record.popularity < min_popularity {
                return false;
            }
        }
        if filters.exclude_seed_artists && seed_artist_ids.contains(&record.artist_id) {
            return false;
        }
        true
    });
}

/// Applies the universal `(score desc, popularity desc, track_id asc)`
/// tie-break, then `max_per_artist` — capped after sorting so each artist's
/// highest scoring tracks are the ones kept.
fn sort_and_cap(candidates: &mut Vec<Recommendation>, filters: &FilterSpec, records: &HashMap<TrackId, TrackRecord>) {
    candidates.sort_by(|a, b| {
        let popularity_of = |id: &TrackId| records.get(id).map(|r| r.popularity).unwrap_or(0);
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| popularity_of(&b.track_id).cmp(&popularity_of(&a.track_id)))
            .then_with(|| a.track_id.cmp(&b.track_id))
    });

    if let Some(max_per_artist) = filters.max_per_artist {
        let mut seen_per_artist: HashMap<String, u32> = HashMap::new();
        candidates.retain(|c| {
            let Some(record) = records.get(&c.track_id) else { return false };
            let count = seen_per_artist.entry(record.artist_id.clone()).or_insert(0);
            *count += 1;
            *count <= max_per_artist
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use resonance_recommend_test_utils::{sample_track_record, track_id, ModelsDirBuilder};
    use resonance_recommend_track_lookup::InMemoryCatalog;

    use super::*;

    fn build_engine(audio_variants: &[(&str, f32)], lyrics_n: usize, n: usize) -> Engine {
        let mut builder = ModelsDirBuilder::new();
        for (name, spacing) in audio_variants {
            builder = builder.with_audio_variant(name, n, 3, *spacing);
        }
        builder = builder.with_lyrics_variant("v1", 4, lyrics_n);
        let dir = builder;

        let report = resonance_recommend_artifacts::load(dir.path()).unwrap();
        let vectorizer = Arc::new(report.lyrics_vectorizer.unwrap());

        let audio_default = report.audio_variants[0].descriptor.name.clone();
        let audio: Vec<Arc<AudioIndex>> =
            report.audio_variants.into_iter().map(|a| Arc::new(AudioIndex::build(a, None))).collect();
        let audio_registry = FamilyRegistry::new(audio, &audio_default);

        let lyrics_default = report.lyrics_variants[0].descriptor.name.clone();
        let lyrics: Vec<Arc<LyricsIndex>> =
            report.lyrics_variants.into_iter().map(|a| Arc::new(LyricsIndex::build(a, Arc::clone(&vectorizer)))).collect();
        let lyrics_registry = FamilyRegistry::new(lyrics, &lyrics_default);

        let catalog = InMemoryCatalog::new();
        for i in 0..n as u8 {
            catalog.insert(sample_track_record(i, &format!("artist-{}", i % 3), 50 + i));
        }
        let lookup: Arc<dyn TrackLookup> = Arc::new(catalog);

        let config = EngineConfig {
            models_path: dir.path().to_path_buf(),
            cache_max_entries: 100,
            cache_default_ttl: Duration::from_secs(60),
            per_cluster_cache_max: 64,
            keep_warm_variants: 2,
        };
        Engine::new(audio_registry, lyrics_registry, lookup, &config)
    }

    fn sample_engine() -> Engine {
        build_engine(&[("v1", 1.0)], 8, 8)
    }

    fn plain_request(seed: TrackId, k: u8, strategy: Strategy) -> Request {
        Request { seed_ids: vec![seed], k, strategy, variant: None, filters: None, diversity_seed: None }
    }

    #[tokio::test]
    async fn cluster_strategy_ranks_by_distance_and_excludes_seed() {
        let engine = sample_engine();
        let response = engine.similar_by_track(track_id(0), 3, Strategy::Cluster).await.unwrap();
        let ids: Vec<TrackId> = response.recommendations.iter().map(|r| r.track_id).collect();
        assert_eq!(ids, vec![track_id(1), track_id(2), track_id(3)]);
        assert!(response.recommendations.windows(2).all(|w| w[0].similarity_score >= w[1].similarity_score));
        assert!(response.recommendations.iter().all(|r| (0.0..=100.0).contains(&r.similarity_score)));
    }

    #[tokio::test]
    async fn unknown_solo_seed_is_rejected() {
        let engine = sample_engine();
        let err = engine.similar_by_track(track_id(99), 3, Strategy::Cluster).await.unwrap_err();
        assert!(matches!(err, EngineError::NoValidSeeds));
    }

    #[tokio::test]
    async fn k_out_of_range_is_rejected() {
        let engine = sample_engine();
        let err = engine.similar_by_track(track_id(0), 0, Strategy::Cluster).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidK { .. }));
    }

    #[tokio::test]
    async fn filters_drop_low_popularity_and_excluded_ids() {
        let engine = sample_engine();
        let request = Request {
            filters: Some(FilterSpec {
                min_popularity: Some(56),
                exclude_ids: std::iter::once(track_id(2)).collect(),
                ..Default::default()
            }),
            ..plain_request(track_id(0), 5, Strategy::Cluster)
        };
        let response = engine.recommend(request).await.unwrap();
        let ids: Vec<TrackId> = response.recommendations.iter().map(|r| r.track_id).collect();
        assert_eq!(ids, vec![track_id(6), track_id(7)]);
    }

    #[tokio::test]
    async fn switch_variant_is_visible_to_the_next_query() {
        let engine = build_engine(&[("v1", 1.0), ("v2", 5.0)], 8, 8);

        let before = engine.similar_by_track(track_id(0), 2, Strategy::Cluster).await.unwrap();
        assert_eq!(before.variant_ids.audio.as_deref(), Some("audio:v1"));

        let prior = engine.switch_variant(Family::Audio, "v2").unwrap();
        assert_eq!(prior, "v1");

        let after = engine.similar_by_track(track_id(0), 2, Strategy::Cluster).await.unwrap();
        assert_eq!(after.variant_ids.audio.as_deref(), Some("audio:v2"));
    }

    #[tokio::test]
    async fn switching_to_an_unknown_variant_is_rejected() {
        let engine = sample_engine();
        let err = engine.switch_variant(Family::Audio, "missing").unwrap_err();
        assert!(matches!(err, EngineError::UnknownVariant(name, Family::Audio) if name == "missing"));
    }

    #[tokio::test]
    async fn identical_requests_return_identical_results() {
        let engine = sample_engine();
        let request = plain_request(track_id(0), 3, Strategy::Cluster);
        let first = engine.recommend(request.clone()).await.unwrap();
        let second = engine.recommend(request).await.unwrap();
        assert_eq!(first.recommendations, second.recommendations);
    }

    #[tokio::test]
    async fn global_strategy_resolves_every_literal_seed_regardless_of_index_membership() {
        let engine = sample_engine();
        let response = engine.similar_by_track(track_id(0), 3, Strategy::Global).await.unwrap();
        assert!(!response.recommendations.is_empty());
        assert!(response.recommendations.iter().all(|r| r.track_id != track_id(0)));
    }
}
