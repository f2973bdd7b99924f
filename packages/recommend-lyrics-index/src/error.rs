use thiserror::Error;

use resonance_recommend_types::TrackId;

#[derive(Debug, Error)]
pub enum LyricsIndexError {
    #[error("lyrics text is empty or whitespace-only")]
    NoLyrics,

    #[error("track {0} has no stored lyrics")]
    TrackHasNoLyrics(TrackId),

    #[error("track {0} not found by the host catalog")]
    TrackNotFound(TrackId),
}
