//! Engine configuration loaded from environment variables (§6).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Knobs the engine reads at startup (§6's "Environment" table).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory C1 loads artifacts from.
    pub models_path: PathBuf,
    /// C8 capacity before LRU eviction kicks in.
    pub cache_max_entries: usize,
    /// C8 default TTL for a freshly stored entry.
    pub cache_default_ttl: Duration,
    /// Per-family per-cluster sub-index cache capacity (C3).
    pub per_cluster_cache_max: usize,
    /// How many variants per family stay loaded (and thus hot-switchable)
    /// at once; the rest are evicted from memory on `switch`.
    pub keep_warm_variants: usize,
}

const DEFAULT_CACHE_MAX_ENTRIES: usize = 100;
const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;
const DEFAULT_PER_CLUSTER_CACHE_MAX: usize = 64;
const DEFAULT_KEEP_WARM_VARIANTS: usize = 2;

impl EngineConfig {
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            models_path: PathBuf::from(
                env::var("MODELS_PATH").map_err(|_| ConfigError::MissingEnvVar("MODELS_PATH".to_string()))?,
            ),
            cache_max_entries: parse_env("RECOMMEND_CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES)?,
            cache_default_ttl: Duration::from_secs(parse_env(
                "RECOMMEND_CACHE_DEFAULT_TTL_SEC",
                DEFAULT_CACHE_TTL_SECS,
            )?),
            per_cluster_cache_max: parse_env("RECOMMEND_PER_CLUSTER_CACHE_MAX", DEFAULT_PER_CLUSTER_CACHE_MAX)?,
            keep_warm_variants: parse_env("RECOMMEND_KEEP_WARM_VARIANTS", DEFAULT_KEEP_WARM_VARIANTS)?,
        })
    }
}

fn parse_env<T>(name: &str, default: T) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{e}"))),
        Err(_) => Ok(default),
    }
}
