use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Deterministic lyrics preprocessing recipe, loaded from training metadata.
/// Must be applied bit-for-bit identically at inference time (§4.4, §9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingRecipe {
    pub case_fold: bool,
    pub strip_non_alpha: bool,
    pub lemmatize: bool,
    pub stopword_set: BTreeSet<String>,
    pub min_token_length: usize,
}

impl Default for PreprocessingRecipe {
    fn default() -> Self {
        Self {
            case_fold: true,
            strip_non_alpha: true,
            lemmatize: true,
            stopword_set: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            min_token_length: 3,
        }
    }
}

/// A small, common English stopword list used when an artifact doesn't ship
/// its own (e.g. in tests and the reference fixtures).
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "a", "an", "of", "to", "in", "is", "it", "you", "that", "was", "for", "on",
    "are", "with", "as", "at", "this", "but", "by", "from", "or", "be", "not", "we", "they",
    "she", "her", "his", "him", "my", "your", "our", "me", "i",
];
