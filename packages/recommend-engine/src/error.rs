//! Engine error kinds (§7): strategies degrade rather than propagate most of
//! these, so only a handful ever reach the facade's caller.

use resonance_recommend_types::{TrackId, UnknownStrategy};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// None of a request's seeds resolved to anything usable.
    #[error("no valid seeds: none of the requested seed ids are known to the active variant")]
    NoValidSeeds,

    /// A single-track operation (e.g. `similar_by_track`) named an unknown id.
    #[error("track {0} not found")]
    NotFound(TrackId),

    /// The request named a strategy the engine doesn't implement.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(#[from] UnknownStrategy),

    /// `switch_variant` or a request named a variant that isn't loaded.
    #[error("unknown variant '{0}' for family {1}")]
    UnknownVariant(String, resonance_recommend_types::Family),

    /// Requested `k` is outside `[1, Request::MAX_K]`.
    #[error("k must be between 1 and {max}, got {actual}")]
    InvalidK { max: u8, actual: u8 },

    /// The request's cancellation token fired before a result was produced.
    #[error("request cancelled")]
    Cancelled,
}

pub type EngineResult<T> = Result<T, EngineError>;
