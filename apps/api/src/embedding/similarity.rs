//! Cosine similarity between embedding vectors, reported as a 0–100 percentage.

use tracing::warn;

/// Cosine similarity in `[-1.0, 1.0]`.
///
/// Returns `0.0` when either vector has zero norm or the dimensions differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        warn!(
            "Embedding dimension mismatch ({} vs {}); treating as dissimilar",
            a.len(),
            b.len()
        );
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Maps cosine similarity from `[-1, 1]` onto `[0, 100]` via `(sim + 1) / 2 * 100`.
///
/// A zero-norm vector on either side yields `0.0`, not the midpoint.
pub fn similarity_percentage(a: &[f32], b: &[f32]) -> f64 {
    if is_zero(a) || is_zero(b) {
        return 0.0;
    }
    (cosine_similarity(a, b) + 1.0) / 2.0 * 100.0
}

fn is_zero(v: &[f32]) -> bool {
    v.iter().all(|x| *x == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_100() {
        let v = [0.3, -1.2, 4.5];
        assert!((similarity_percentage(&v, &v) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors_score_50() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0];
        assert!((similarity_percentage(&a, &b) - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors_score_0() {
        let a = [1.0, 2.0];
        let b = [-1.0, -2.0];
        assert!(similarity_percentage(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_0() {
        let zero = [0.0, 0.0, 0.0];
        let v = [1.0, 2.0, 3.0];
        assert_eq!(similarity_percentage(&zero, &v), 0.0);
        assert_eq!(similarity_percentage(&v, &zero), 0.0);
        assert_eq!(similarity_percentage(&zero, &zero), 0.0);
    }

    #[test]
    fn test_empty_vectors_score_0() {
        assert_eq!(similarity_percentage(&[], &[]), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_is_dissimilar() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_result_always_in_range() {
        let pairs: [(&[f32], &[f32]); 3] = [
            (&[1.0, 1.0], &[1.0, 0.9999]),
            (&[-3.0, 2.0], &[5.0, 0.1]),
            (&[1e-20, 1e20], &[1e20, 1e-20]),
        ];
        for (a, b) in pairs {
            let s = similarity_percentage(a, b);
            assert!((0.0..=100.0).contains(&s), "out of range: {s}");
        }
    }
}
