//! Vector similarity primitives.
//!
//! All functions are total: malformed input (length mismatch, empty or
//! all-zero vectors) yields "no similarity" rather than a fault, so a
//! missing or corrupt embedding can never abort a retrieval pass.

/// L2-normalize a vector. An all-zero input is returned unchanged.
pub fn normalize_l2(vector: &[f32]) -> Vec<f32> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter().map(|x| x / norm).collect()
    } else {
        vector.to_vec()
    }
}

/// Dot product. Mismatched lengths (including either side empty) score 0.0.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Cosine similarity: dot product of the L2-normalized inputs.
///
/// Identical directions → 1.0, opposite → -1.0, orthogonal → 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    dot(&normalize_l2(a), &normalize_l2(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_identical_is_one() {
        let v = vec![3.0, 4.0, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite_is_negative_one() {
        let v = vec![1.0, 2.0, 3.0];
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&v, &neg) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn dot_length_mismatch_is_zero() {
        assert_eq!(dot(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(dot(&[], &[]), 0.0);
    }

    #[test]
    fn normalize_zero_vector_passes_through() {
        assert_eq!(normalize_l2(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn normalize_produces_unit_length() {
        let normalized = normalize_l2(&[3.0, 4.0]);
        let norm: f32 = normalized.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }
}
