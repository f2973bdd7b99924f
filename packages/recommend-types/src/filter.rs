use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::track_id::TrackId;

/// Post-generation, pre-truncation filters for a recommendation request.
///
/// Every field is optional; an unset field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub year_range: Option<(u16, u16)>,
    pub min_popularity: Option<u8>,
    #[serde(default)]
    pub exclude_seed_artists: bool,
    pub max_per_artist: Option<u32>,
    #[serde(default)]
    pub exclude_ids: BTreeSet<TrackId>,
}

impl FilterSpec {
    /// Canonical string form used as part of the cache-key fingerprint.
    /// Deterministic regardless of construction order (`BTreeSet` keeps
    /// `exclude_ids` sorted already).
    pub fn canonical(&self) -> String {
        let excludes: Vec<String> = self.exclude_ids.iter().map(|id| id.to_string()).collect();
        format!(
            "yr={:?}|pop={:?}|xartist={}|maxpa={:?}|excl={}",
            self.year_range,
            self.min_popularity,
            self.exclude_seed_artists,
            self.max_per_artist,
            excludes.join(",")
        )
    }
}
