use serde::{Deserialize, Serialize};

use crate::track_id::TrackId;

/// Audio-feature summary for a track, each value normalized to `[0, 1]`.
///
/// Modeled as a fixed struct rather than an open map: the spec names exactly
/// these seven features, and every reader of this type (the genre-based
/// strategy in particular) iterates the same fixed key set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatureSummary {
    pub danceability: f32,
    pub energy: f32,
    pub valence: f32,
    pub acousticness: f32,
    pub instrumentalness: f32,
    pub liveness: f32,
    pub speechiness: f32,
}

impl AudioFeatureSummary {
    /// Iterate `(feature name, value)` pairs in a fixed, stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> {
        [
            ("danceability", self.danceability),
            ("energy", self.energy),
            ("valence", self.valence),
            ("acousticness", self.acousticness),
            ("instrumentalness", self.instrumentalness),
            ("liveness", self.liveness),
            ("speechiness", self.speechiness),
        ]
        .into_iter()
    }
}

/// A track's display/metadata record, as resolved by the host's
/// `TrackLookup` collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: TrackId,
    pub name: String,
    pub artist_name: String,
    pub artist_id: String,
    pub album_name: Option<String>,
    pub duration_ms: u32,
    pub popularity: u8,
    pub key: u8,
    pub mode: u8,
    pub tempo: f32,
    pub year: Option<u16>,
    pub preview_url: Option<String>,
    pub album_image_url: Option<String>,
    pub audio_feature_summary: AudioFeatureSummary,
    pub lyrics: Option<String>,
}
