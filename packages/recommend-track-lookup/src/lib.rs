//! Host-supplied track metadata lookup (§4.6).
//!
//! The engine never owns a track catalog; it queries the host through this
//! trait for display metadata, lyrics text, and artist grouping.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use resonance_recommend_types::{TrackId, TrackRecord};

/// Host-implemented catalog access. Implementations MUST return stable
/// records for IDs the catalog contains and simply omit IDs it doesn't —
/// the engine drops unmatched candidates and continues rather than erroring.
#[async_trait]
pub trait TrackLookup: Send + Sync {
    async fn lookup(&self, track_ids: &[TrackId]) -> HashMap<TrackId, TrackRecord>;

    /// Tracks by a given artist id, used by the artist-based strategy.
    /// Implementations unable to group by artist may return an empty list.
    async fn tracks_by_artist(&self, artist_id: &str) -> Vec<TrackId>;

    /// A host-curated "popular enough to recommend" candidate pool, used by
    /// the genre-based and popularity strategies. The host decides what
    /// "popular enough" means (e.g. a minimum play count or chart
    /// threshold); the engine only ranks within whatever this returns.
    async fn candidate_pool(&self) -> Vec<TrackId>;
}

/// Simple in-memory reference implementation, primarily for tests and the
/// bundled demo server — a real deployment backs `TrackLookup` with its own
/// catalog store.
#[derive(Default)]
pub struct InMemoryCatalog {
    records: RwLock<HashMap<TrackId, TrackRecord>>,
    by_artist: RwLock<HashMap<String, Vec<TrackId>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: TrackRecord) {
        let artist_id = record.artist_id.clone();
        let id = record.id;
        self.records.write().unwrap().insert(id, record);
        self.by_artist.write().unwrap().entry(artist_id).or_default().push(id);
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TrackLookup for InMemoryCatalog {
    async fn lookup(&self, track_ids: &[TrackId]) -> HashMap<TrackId, TrackRecord> {
        let records = self.records.read().unwrap();
        track_ids.iter().filter_map(|id| records.get(id).map(|r| (*id, r.clone()))).collect()
    }

    async fn tracks_by_artist(&self, artist_id: &str) -> Vec<TrackId> {
        self.by_artist.read().unwrap().get(artist_id).cloned().unwrap_or_default()
    }

    async fn candidate_pool(&self) -> Vec<TrackId> {
        self.records.read().unwrap().keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(i: u8, artist: &str) -> TrackRecord {
        let mut bytes = [0u8; 22];
        bytes[0] = i;
        TrackRecord {
            id: TrackId::from_bytes(bytes),
            name: format!("Track {i}"),
            artist_name: artist.to_string(),
            artist_id: artist.to_string(),
            album_name: None,
            duration_ms: 200_000,
            popularity: 50,
            key: 0,
            mode: 1,
            tempo: 120.0,
            year: Some(2020),
            preview_url: None,
            album_image_url: None,
            audio_feature_summary: Default::default(),
            lyrics: None,
        }
    }

    #[tokio::test]
    async fn lookup_returns_only_known_ids() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(track(1, "artist-a"));

        let mut unknown_bytes = [0u8; 22];
        unknown_bytes[0] = 99;
        let unknown = TrackId::from_bytes(unknown_bytes);

        let found = catalog.lookup(&[track(1, "artist-a").id, unknown]).await;
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn tracks_by_artist_groups_insertions() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(track(1, "artist-a"));
        catalog.insert(track(2, "artist-a"));
        catalog.insert(track(3, "artist-b"));

        let a_tracks = catalog.tracks_by_artist("artist-a").await;
        assert_eq!(a_tracks.len(), 2);
        assert_eq!(catalog.tracks_by_artist("artist-c").await.len(), 0);
    }

    #[tokio::test]
    async fn candidate_pool_reports_every_inserted_track() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(track(1, "artist-a"));
        catalog.insert(track(2, "artist-b"));

        assert_eq!(catalog.candidate_pool().await.len(), 2);
    }
}
