//! Deterministic lyrics preprocessing (§4.4). Order matters and must match
//! bit-for-bit between training-time artifacts and inference-time queries —
//! drift is treated as an error, not silently tolerated (§9 open question 2).

use once_cell::sync::Lazy;
use regex::Regex;
use resonance_recommend_types::PreprocessingRecipe;

use crate::error::LyricsIndexError;
use crate::lemmatizer::lemmatize;

static NON_ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[^a-z\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Runs the full pipeline and returns the cleaned, whitespace-joined tokens.
/// Fails fast on empty/whitespace-only input (step 1).
pub fn preprocess(text: &str, recipe: &PreprocessingRecipe) -> Result<String, LyricsIndexError> {
    if text.trim().is_empty() {
        return Err(LyricsIndexError::NoLyrics);
    }

    let mut cleaned = if recipe.case_fold { text.to_lowercase() } else { text.to_string() };

    if recipe.strip_non_alpha {
        cleaned = NON_ALPHA.replace_all(&cleaned, "").into_owned();
    }

    cleaned = WHITESPACE.replace_all(&cleaned, " ").trim().to_string();

    if cleaned.is_empty() {
        return Err(LyricsIndexError::NoLyrics);
    }

    let tokens: Vec<String> = cleaned
        .split_whitespace()
        .map(|t| if recipe.lemmatize { lemmatize(t) } else { t.to_string() })
        .filter(|t| t.len() >= recipe.min_token_length && !recipe.stopword_set.contains(t))
        .collect();

    Ok(tokens.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> PreprocessingRecipe {
        PreprocessingRecipe::default()
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(preprocess("   ", &recipe()), Err(LyricsIndexError::NoLyrics)));
    }

    #[test]
    fn strips_punctuation_and_digits() {
        let out = preprocess("Hello, world! 2024 rocks...", &recipe()).unwrap();
        assert!(!out.contains(','));
        assert!(!out.contains('2'));
    }

    #[test]
    fn drops_stopwords_and_short_tokens() {
        let out = preprocess("the cat sat on a mat", &recipe()).unwrap();
        assert!(!out.split(' ').any(|t| t == "the" || t == "on" || t == "a"));
    }

    #[test]
    fn collapses_repeated_whitespace() {
        let out = preprocess("lonely   nights    falling", &recipe()).unwrap();
        assert!(!out.contains("  "));
    }

    #[test]
    fn strip_non_alpha_keeps_uppercase_letters_when_case_fold_is_off() {
        let recipe = PreprocessingRecipe { case_fold: false, lemmatize: false, min_token_length: 1, ..recipe() };
        let out = preprocess("Midnight City", &recipe).unwrap();
        assert_eq!(out, "Midnight City");
    }
}
