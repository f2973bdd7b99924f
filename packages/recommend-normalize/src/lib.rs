//! Distance-to-similarity normalization.
//!
//! Converts raw nearest-neighbor distances (Euclidean, cosine, whatever a
//! variant's metric produces) into comparable `[0, 1]` similarity scores.
//! One pipeline, four selectable conversion curves, so every strategy in
//! `resonance-recommend-engine` reports scores on the same scale regardless
//! of which index produced the distances.

pub use resonance_recommend_types::SimilarityMethod;

/// Convert a single distance to a `[0, 1]` similarity using the given method
/// and scale factor. Negative distances are clamped to zero.
pub fn distance_to_similarity(distance: f64, method: SimilarityMethod, scale_factor: f64) -> f64 {
    let d = distance.max(0.0);
    match method {
        SimilarityMethod::Exponential => (-d * scale_factor).exp(),
        SimilarityMethod::Inverse => 1.0 / (1.0 + d * scale_factor),
        SimilarityMethod::Gaussian => (-(d * d) / (2.0 * scale_factor * scale_factor)).exp(),
        SimilarityMethod::Linear => (1.0 - d / scale_factor).max(0.0),
    }
}

/// Convert a batch of distances to normalized, comparable similarity scores.
///
/// Scale factor is auto-selected from the batch's own distribution (median
/// for exponential/inverse, standard deviation for gaussian, max for
/// linear), then a final min-max pass stretches the batch so the best
/// candidate maps to `1.0` and the worst to `0.0` (skipped when every
/// distance produced the same similarity).
///
/// A single-element batch always returns `[1.0]`: with nothing to rank
/// against, the lone candidate is definitionally the best available match.
pub fn normalize(distances: &[f64], method: SimilarityMethod) -> Vec<f64> {
    if distances.is_empty() {
        return Vec::new();
    }
    if distances.len() == 1 {
        return vec![1.0];
    }

    let scale_factor = scale_factor_for(distances, method);
    let mut similarities: Vec<f64> = distances
        .iter()
        .map(|&d| distance_to_similarity(d, method, scale_factor))
        .collect();

    let min = similarities.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = similarities
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    if max > min {
        for s in similarities.iter_mut() {
            *s = (*s - min) / (max - min);
        }
    }

    similarities
}

/// Convenience wrapper returning `0..=100` integer-scale scores, the unit
/// `Recommendation::similarity_score` is reported in.
pub fn normalize_to_percent(distances: &[f64], method: SimilarityMethod) -> Vec<f64> {
    normalize(distances, method)
        .into_iter()
        .map(|s| s * 100.0)
        .collect()
}

fn scale_factor_for(distances: &[f64], method: SimilarityMethod) -> f64 {
    match method {
        SimilarityMethod::Linear => {
            let max = distances.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            if max > 0.0 {
                max
            } else {
                1.0
            }
        }
        SimilarityMethod::Exponential | SimilarityMethod::Inverse => {
            let m = median(distances);
            if m > 0.0 {
                1.0 / m
            } else {
                1.0
            }
        }
        SimilarityMethod::Gaussian => {
            let sd = stddev(distances);
            if sd > 0.0 {
                sd
            } else {
                1.0
            }
        }
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

fn stddev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
