use serde::{Deserialize, Serialize};

/// A recommendation strategy, selected per-request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Cluster,
    HdbscanKnn,
    Lyrics,
    ArtistBased,
    GenreBased,
    Global,
    Hybrid,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Cluster => "cluster",
            Strategy::HdbscanKnn => "hdbscan_knn",
            Strategy::Lyrics => "lyrics",
            Strategy::ArtistBased => "artist_based",
            Strategy::GenreBased => "genre_based",
            Strategy::Global => "global",
            Strategy::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cluster" => Ok(Strategy::Cluster),
            "hdbscan_knn" => Ok(Strategy::HdbscanKnn),
            "lyrics" => Ok(Strategy::Lyrics),
            "artist_based" => Ok(Strategy::ArtistBased),
            "genre_based" => Ok(Strategy::GenreBased),
            "global" => Ok(Strategy::Global),
            "hybrid" => Ok(Strategy::Hybrid),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown strategy: {0}")]
pub struct UnknownStrategy(pub String);
