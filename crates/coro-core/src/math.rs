//! Integer mixing and saturation arithmetic shared by the chorus engines.
//!
//! The engines keep their modulation math in f32 but mix and clamp in
//! integers, preserving the fixed-point behavior of the original hardware
//! pipeline. All functions here are allocation-free and suitable for
//! `no_std`.

use libm::roundf;

/// Flush subnormal-range values to zero.
///
/// Recursive filters can decay into the subnormal range, where some FPUs
/// fall off their fast path. Anything below 1e-20 is inaudible at 16-bit
/// scale by a wide margin.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Convert a unit-interval mix value to Q8 fixed-point gain.
///
/// Returns `round(mix * 256)` clamped to `[0, 256]`. The complementary dry
/// gain is `256 - q8_gain(mix)`, so the pair always sums to exactly 256.
#[inline]
pub fn q8_gain(mix: f32) -> i32 {
    (roundf(mix * 256.0) as i32).clamp(0, 256)
}

/// Blend a dry sample with a wet value using Q8 fixed-point gains.
///
/// Computes `(dry * dry256 + wet * wet256) >> 8` and clamps to the 16-bit
/// signed range. With `wet256 + dry256 == 256` and `wet == dry`, the result
/// is exactly `dry` — the arithmetic shift preserves the identity for
/// negative samples too.
///
/// # Example
///
/// ```rust
/// use coro_core::{mix_q8, q8_gain};
///
/// let wet256 = q8_gain(0.5);
/// let dry256 = 256 - wet256;
/// assert_eq!(mix_q8(1000, 3000, wet256, dry256), 2000);
/// ```
#[inline]
pub fn mix_q8(dry: i16, wet: i32, wet256: i32, dry256: i32) -> i16 {
    let out = (i32::from(dry) * dry256 + wet * wet256) >> 8;
    clamp_i16(out)
}

/// Clamp a 32-bit intermediate to the 16-bit signed sample range.
#[inline]
pub fn clamp_i16(x: i32) -> i16 {
    x.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Soft saturation knee.
///
/// Values within `±threshold` pass through; the excursion beyond the
/// threshold is scaled by `ratio`. With a ratio below 1.0 this compresses
/// peaks instead of flat-topping them, which reads as warmth rather than
/// clipping on program material.
///
/// # Example
///
/// ```rust
/// use coro_core::soft_knee;
///
/// assert_eq!(soft_knee(10_000.0, 16_000.0, 0.3), 10_000.0);
/// assert_eq!(soft_knee(26_000.0, 16_000.0, 0.3), 19_000.0);
/// assert_eq!(soft_knee(-26_000.0, 16_000.0, 0.3), -19_000.0);
/// ```
#[inline]
pub fn soft_knee(x: f32, threshold: f32, ratio: f32) -> f32 {
    if x > threshold {
        threshold + (x - threshold) * ratio
    } else if x < -threshold {
        -threshold + (x + threshold) * ratio
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1.0), 1.0);
        assert_eq!(flush_denormal(-0.5), -0.5);
        assert_eq!(flush_denormal(1e-10), 1e-10);
        assert_eq!(flush_denormal(1e-21), 0.0);
        assert_eq!(flush_denormal(-1e-21), 0.0);
        assert_eq!(flush_denormal(0.0), 0.0);
    }

    #[test]
    fn test_q8_gain_endpoints() {
        assert_eq!(q8_gain(0.0), 0);
        assert_eq!(q8_gain(1.0), 256);
        assert_eq!(q8_gain(0.5), 128);
        assert_eq!(q8_gain(-1.0), 0);
        assert_eq!(q8_gain(2.0), 256);
    }

    #[test]
    fn test_mix_q8_full_dry_is_identity() {
        for dry in [i16::MIN, -1234, -1, 0, 1, 1234, i16::MAX] {
            assert_eq!(mix_q8(dry, 9999, 0, 256), dry);
        }
    }

    #[test]
    fn test_mix_q8_full_wet_ignores_dry() {
        assert_eq!(mix_q8(12345, 500, 256, 0), 500);
        assert_eq!(mix_q8(-12345, -500, 256, 0), -500);
    }

    #[test]
    fn test_mix_q8_equal_inputs_pass_through() {
        // wet == dry must survive the blend exactly at any mix setting,
        // including negative samples under the arithmetic shift.
        for mix in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let wet256 = q8_gain(mix);
            let dry256 = 256 - wet256;
            for s in [i16::MIN, -777, 0, 777, i16::MAX] {
                assert_eq!(mix_q8(s, i32::from(s), wet256, dry256), s);
            }
        }
    }

    #[test]
    fn test_mix_q8_clamps_overflow() {
        assert_eq!(mix_q8(i16::MAX, i32::from(i16::MAX) * 2, 256, 256), i16::MAX);
        assert_eq!(mix_q8(i16::MIN, i32::from(i16::MIN) * 2, 256, 256), i16::MIN);
    }

    #[test]
    fn test_clamp_i16() {
        assert_eq!(clamp_i16(0), 0);
        assert_eq!(clamp_i16(32_767), 32_767);
        assert_eq!(clamp_i16(32_768), 32_767);
        assert_eq!(clamp_i16(-32_768), -32_768);
        assert_eq!(clamp_i16(-100_000), -32_768);
    }

    #[test]
    fn test_soft_knee_below_threshold_is_identity() {
        assert_eq!(soft_knee(15_999.0, 16_000.0, 0.3), 15_999.0);
        assert_eq!(soft_knee(-15_999.0, 16_000.0, 0.3), -15_999.0);
        assert_eq!(soft_knee(0.0, 16_000.0, 0.3), 0.0);
    }

    #[test]
    fn test_soft_knee_compresses_symmetrically() {
        let pos = soft_knee(20_000.0, 16_000.0, 0.3);
        let neg = soft_knee(-20_000.0, 16_000.0, 0.3);
        assert_eq!(pos, 17_200.0);
        assert_eq!(neg, -17_200.0);
    }

    #[test]
    fn test_soft_knee_bounds_full_scale() {
        // Worst case for the engines: a full-scale post-filter value.
        let bound = 16_000.0 + (32_767.0 - 16_000.0) * 0.3;
        assert!(soft_knee(32_767.0, 16_000.0, 0.3) <= bound);
    }
}
