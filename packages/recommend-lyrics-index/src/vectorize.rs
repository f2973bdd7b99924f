//! TF-IDF vectorization of preprocessed lyrics text against a loaded
//! vocabulary + idf table (§4.4).

use resonance_recommend_artifacts::LyricsVectorizer;

/// A sparse TF-IDF vector: `(column, weight)` pairs sorted by column,
/// L2-normalized, matching scikit-learn's `TfidfVectorizer` default.
pub struct SparseVector {
    pub entries: Vec<(u32, f32)>,
    pub norm: f32,
}

impl SparseVector {
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (ci, vi) = self.entries[i];
            let (cj, vj) = other.entries[j];
            match ci.cmp(&cj) {
                std::cmp::Ordering::Equal => {
                    sum += vi * vj;
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        sum
    }

    /// Dense representation, used when the variant carries an SVD
    /// projection that must be applied as a dense matrix-vector product.
    pub fn to_dense(&self, dim: usize) -> Vec<f32> {
        let mut dense = vec![0.0f32; dim];
        for &(col, value) in &self.entries {
            if (col as usize) < dim {
                dense[col as usize] = value;
            }
        }
        dense
    }
}

/// Tokenizes on whitespace (the preprocessing pipeline already normalized
/// the text), builds n-grams per the vectorizer's configured range, looks
/// each up in the vocabulary, accumulates raw term frequency times idf,
/// then L2-normalizes.
pub fn vectorize(preprocessed: &str, vectorizer: &LyricsVectorizer) -> SparseVector {
    let tokens: Vec<&str> = preprocessed.split_whitespace().collect();
    let mut raw: std::collections::HashMap<u32, f32> = std::collections::HashMap::new();

    for n in vectorizer.ngram_min..=vectorizer.ngram_max {
        if n == 0 || tokens.len() < n {
            continue;
        }
        for window in tokens.windows(n) {
            let gram = window.join(" ");
            if let Some(&(col, idf)) = vectorizer.vocabulary.get(&gram) {
                *raw.entry(col).or_insert(0.0) += idf;
            }
        }
    }

    let mut entries: Vec<(u32, f32)> = raw.into_iter().collect();
    entries.sort_by_key(|(col, _)| *col);

    let norm = entries.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, v) in entries.iter_mut() {
            *v /= norm;
        }
    }

    SparseVector { entries, norm: if norm > 0.0 { 1.0 } else { 0.0 } }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vectorizer() -> LyricsVectorizer {
        let mut vocabulary = HashMap::new();
        vocabulary.insert("love".to_string(), (0u32, 1.0f32));
        vocabulary.insert("night".to_string(), (1u32, 2.0f32));
        LyricsVectorizer { vocabulary, dim: 2, ngram_min: 1, ngram_max: 1 }
    }

    #[test]
    fn produces_l2_normalized_sparse_vector() {
        let v = vectorize("love love night", &vectorizer());
        let norm_sq: f32 = v.entries.iter().map(|(_, w)| w * w).sum();
        assert!((norm_sq - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ignores_out_of_vocabulary_terms() {
        let v = vectorize("love xyzzy", &vectorizer());
        assert_eq!(v.entries.len(), 1);
    }

    #[test]
    fn empty_text_yields_empty_vector() {
        let v = vectorize("", &vectorizer());
        assert!(v.entries.is_empty());
    }
}
