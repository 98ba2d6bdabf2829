//! Scalar quantization of normalized vectors to signed 8-bit integers.
//!
//! Each component of a unit vector lies in `[-1, 1]`, so it is stored as
//! `round(x * 127)`. Rounding error can push a component slightly past the
//! boundary; values are clamped to `[-127, 127]` instead of wrapping.
//!
//! Quantized codes are computed on every insert and persisted with the record.
//! The search path scores against the full-precision vector and does not read
//! them.

/// Multiplier mapping `[-1, 1]` onto the symmetric `i8` range.
pub const QUANTIZATION_SCALE: f32 = 127.0;

/// Quantize a normalized vector to one `i8` per component.
pub fn quantize(normalized: &[f32]) -> Vec<i8> {
    normalized
        .iter()
        .map(|&x| {
            (x * QUANTIZATION_SCALE)
                .round()
                .clamp(-QUANTIZATION_SCALE, QUANTIZATION_SCALE) as i8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::core::distance::normalize;

    fn dequantize(codes: &[i8]) -> Vec<f32> {
        codes
            .iter()
            .map(|&c| c as f32 / QUANTIZATION_SCALE)
            .collect()
    }

    #[test]
    fn test_quantize_boundaries() {
        assert_eq!(quantize(&[1.0, -1.0, 0.0]), vec![127, -127, 0]);
        assert_eq!(quantize(&[0.5, -0.5]), vec![64, -64]);
    }

    #[test]
    fn test_quantize_clamps_overshoot() {
        // Slightly past the unit boundary must saturate, not wrap.
        assert_eq!(quantize(&[1.0000002, -1.0000002]), vec![127, -127]);
        assert_eq!(quantize(&[3.0, -3.0]), vec![127, -127]);
    }

    #[test]
    fn test_quantize_has_vector_dimension() {
        let v = normalize(&[0.3, -0.2, 0.9, 0.1, 0.0]);
        assert_eq!(quantize(&v).len(), v.len());
    }

    #[test]
    fn test_dequantize_error_bound() {
        let v = normalize(&[0.3, -0.2, 0.9, 0.1]);
        let restored = dequantize(&quantize(&v));
        for (orig, approx) in v.iter().zip(&restored) {
            assert!((orig - approx).abs() <= 0.5 / QUANTIZATION_SCALE + 1e-6);
        }
    }
}
