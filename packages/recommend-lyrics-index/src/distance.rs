//! Distance functions over the two training-vector representations a
//! lyrics variant may use (§4.4): sparse raw TF-IDF rows, or dense
//! SVD-reduced rows.

use resonance_recommend_types::Metric;

use crate::vectorize::SparseVector;

pub fn sparse_distance(query: &SparseVector, row: impl Iterator<Item = (u32, f32)>, metric: Metric) -> f64 {
    let row_entries: Vec<(u32, f32)> = row.collect();
    let row_vec = SparseVector { entries: row_entries, norm: 1.0 };

    match metric {
        Metric::Cosine => 1.0 - query.dot(&row_vec) as f64,
        Metric::Euclidean => {
            let dot = query.dot(&row_vec) as f64;
            let query_sq: f64 = query.entries.iter().map(|(_, v)| (*v as f64).powi(2)).sum();
            let row_sq: f64 = row_vec.entries.iter().map(|(_, v)| (*v as f64).powi(2)).sum();
            (query_sq + row_sq - 2.0 * dot).max(0.0).sqrt()
        }
    }
}

pub fn dense_distance(query: &[f32], row: &[f32], metric: Metric) -> f64 {
    match metric {
        Metric::Euclidean => query
            .iter()
            .zip(row.iter())
            .map(|(a, b)| ((*a - *b) as f64).powi(2))
            .sum::<f64>()
            .sqrt(),
        Metric::Cosine => {
            let dot: f64 = query.iter().zip(row.iter()).map(|(a, b)| (*a as f64) * (*b as f64)).sum();
            let qn: f64 = query.iter().map(|a| (*a as f64).powi(2)).sum::<f64>().sqrt();
            let rn: f64 = row.iter().map(|b| (*b as f64).powi(2)).sum::<f64>().sqrt();
            if qn == 0.0 || rn == 0.0 {
                1.0
            } else {
                1.0 - dot / (qn * rn)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_euclidean_zero_for_identical_vectors() {
        assert_eq!(dense_distance(&[1.0, 2.0], &[1.0, 2.0], Metric::Euclidean), 0.0);
    }

    #[test]
    fn dense_cosine_zero_for_parallel_vectors() {
        let d = dense_distance(&[1.0, 1.0], &[2.0, 2.0], Metric::Cosine);
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn sparse_cosine_distance_matches_unit_vectors_dot() {
        let query = SparseVector { entries: vec![(0, 1.0)], norm: 1.0 };
        let d = sparse_distance(&query, vec![(0, 1.0)].into_iter(), Metric::Cosine);
        assert!(d.abs() < 1e-6);
    }
}
