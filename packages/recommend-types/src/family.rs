use serde::{Deserialize, Serialize};

/// A model family. Variants belong to exactly one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Audio,
    Lyrics,
}

impl Family {
    pub const ALL: [Family; 2] = [Family::Audio, Family::Lyrics];

    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Audio => "audio",
            Family::Lyrics => "lyrics",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
