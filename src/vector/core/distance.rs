//! Vector math primitives.
//!
//! Every stored vector and every query is normalized to unit length before it
//! is compared, so [`dot`] of two normalized vectors is their cosine
//! similarity. Search never computes magnitudes on the hot path.

use wide::f32x8;

const LANES: usize = 8;

/// Sum of pairwise products of `a` and `b`.
///
/// Elements are processed eight at a time through `f32x8`, with a scalar
/// loop for the remainder.
///
/// # Preconditions
///
/// `a` and `b` must have the same length. This is checked in debug builds
/// only; in release builds the elements of the longer slice beyond the length
/// of the shorter one are ignored. The store validates dimensions before it
/// calls this function.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "dot product requires equal dimensions");

    let len = a.len().min(b.len());
    let a_chunks = a[..len].chunks_exact(LANES);
    let b_chunks = b[..len].chunks_exact(LANES);
    let a_rem = a_chunks.remainder();
    let b_rem = b_chunks.remainder();

    let mut sum = f32x8::splat(0.0);
    let mut a_buf = [0.0f32; LANES];
    let mut b_buf = [0.0f32; LANES];
    for (ca, cb) in a_chunks.zip(b_chunks) {
        a_buf.copy_from_slice(ca);
        b_buf.copy_from_slice(cb);
        sum += f32x8::new(a_buf) * f32x8::new(b_buf);
    }

    let mut result = sum.to_array().iter().sum::<f32>();
    for (x, y) in a_rem.iter().zip(b_rem) {
        result += x * y;
    }
    result
}

/// Euclidean (L2) magnitude of `v`, accumulated in `f64`.
///
/// Squares of finite `f32` components neither overflow nor underflow in
/// `f64`, so the result is exact to `f32` precision for any finite input.
pub fn magnitude(v: &[f32]) -> f32 {
    magnitude_f64(v) as f32
}

fn magnitude_f64(v: &[f32]) -> f64 {
    v.iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

/// Return a copy of `v` scaled to unit length.
///
/// The division happens in `f64`, so very large or very small finite
/// components still produce a unit vector. A vector whose magnitude is
/// exactly zero is returned unchanged. Such a vector scores 0 against every
/// query, so it never ranks as similar to anything.
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let mag = magnitude_f64(v);
    if mag == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|&x| (f64::from(x) / mag) as f32).collect()
}

/// Check that every component is finite (no NaN or infinity).
pub fn is_finite(v: &[f32]) -> bool {
    v.iter().all(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_dot_short_vectors() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(dot(&[], &[]), 0.0);
    }

    #[test]
    fn test_dot_matches_naive_with_remainder() {
        let a: Vec<f32> = (0..37).map(|i| (i as f32 * 0.37).sin()).collect();
        let b: Vec<f32> = (0..37).map(|i| (i as f32 * 0.11).cos()).collect();

        let expected = naive_dot(&a, &b);
        assert!((dot(&a, &b) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize(&[3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert!((magnitude(&v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_extreme_magnitudes() {
        for raw in [
            [3e20f32, 4e20],
            [3e-23, 4e-23],
            [f32::MAX, f32::MAX],
            [1e-45, 0.0],
        ] {
            let v = normalize(&raw);
            assert!((magnitude(&v) - 1.0).abs() < 1e-6, "{raw:?} -> {v:?}");
        }

        let v = normalize(&[3e20, 4e20]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_magnitude_does_not_overflow() {
        assert!((magnitude(&[3e20, 4e20]) - 5e20).abs() / 5e20 < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        let v = normalize(&[0.0, 0.0, 0.0]);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
        assert_eq!(dot(&v, &normalize(&[1.0, 2.0, 3.0])), 0.0);
    }

    #[test]
    fn test_normalized_dot_is_cosine() {
        let a = normalize(&[1.0, 0.0, 0.0]);
        let b = normalize(&[0.9, 0.1, 0.0]);
        let cosine = 0.9 / (0.9f32 * 0.9 + 0.1 * 0.1).sqrt();
        assert!((dot(&a, &b) - cosine).abs() < 1e-6);
    }

    #[test]
    fn test_is_finite() {
        assert!(is_finite(&[1.0, -2.0, 0.0]));
        assert!(!is_finite(&[1.0, f32::NAN]));
        assert!(!is_finite(&[f32::INFINITY]));
    }
}
