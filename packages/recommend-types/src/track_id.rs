use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Catalog-unique opaque identifier for a track.
///
/// The engine never interprets the bytes; it only compares, hashes, and
/// hands them back to the host's `TrackLookup`. Stored as a fixed 22-byte
/// array per the catalog's ID format.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId([u8; 22]);

/// Error returned when a string does not decode to a valid `TrackId`.
#[derive(Debug, thiserror::Error)]
#[error("invalid track id: {0}")]
pub struct TrackIdError(String);

impl TrackId {
    pub const BYTE_LEN: usize = 22;

    pub const fn from_bytes(bytes: [u8; 22]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 22] {
        &self.0
    }
}

impl fmt::Debug for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrackId({})", self)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl FromStr for TrackId {
    type Err = TrackIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|e| TrackIdError(format!("{s}: {e}")))?;
        let bytes: [u8; 22] = decoded
            .try_into()
            .map_err(|_| TrackIdError(format!("{s}: expected 22 bytes")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for TrackId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TrackId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
