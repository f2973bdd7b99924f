use thiserror::Error;

use resonance_recommend_types::TrackId;

#[derive(Debug, Error)]
pub enum AudioIndexError {
    #[error("track {0} not found in this variant's embedding matrix")]
    NotFound(TrackId),

    #[error("failed to build per-cluster index for cluster {cluster}: {reason}")]
    IndexBuildFailed { cluster: i32, reason: String },
}
