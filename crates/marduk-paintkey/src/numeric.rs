//! Numeric normalization shared by all key variants.
//!
//! Geometry is snapped to a fixed decimal resolution before it is stored, so
//! values that differ only by float noise (an `f32` source versus an `f64`
//! one, a transform folded in a different order) land on the same bit
//! pattern. Keys store bit patterns rather than floats, which makes equality
//! and hashing bit-exact.

/// Rounding resolution: values snap to multiples of `1 / PRECISION`.
pub const PRECISION: f64 = 100_000.0;

/// Rounds `value` to [`PRECISION`] and narrows to `f32`.
#[inline]
pub fn round_off(value: f64) -> f32 {
    round_off_with(value, PRECISION)
}

/// Rounds `value` to multiples of `1 / precision` and narrows to `f32`.
///
/// Negative zero comes back as positive zero.
#[inline]
pub fn round_off_with(value: f64, precision: f64) -> f32 {
    ((value * precision).round() / precision) as f32 + 0.0
}

/// `f64` counterpart of [`round_off`], used for transform coefficients.
#[inline]
pub fn round_off_f64(value: f64) -> f64 {
    (value * PRECISION).round() / PRECISION + 0.0
}

/// Bit pattern of `round_off(value)`.
#[inline]
pub fn rounded_bits(value: f64) -> u32 {
    f32_bits(round_off(value))
}

#[inline]
pub fn f32_bits(value: f32) -> u32 {
    value.to_bits()
}

#[inline]
pub fn f32_from_bits(bits: u32) -> f32 {
    f32::from_bits(bits)
}

#[inline]
pub fn f64_bits(value: f64) -> u64 {
    value.to_bits()
}

#[inline]
pub fn f64_from_bits(bits: u64) -> f64 {
    f64::from_bits(bits)
}

pub fn floats_to_bits(values: &[f32]) -> Vec<u32> {
    values.iter().map(|&v| f32_bits(v)).collect()
}

pub fn bits_to_floats(bits: &[u32]) -> Vec<f32> {
    bits.iter().map(|&b| f32_from_bits(b)).collect()
}

pub fn doubles_to_bits(values: &[f64]) -> Vec<u64> {
    values.iter().map(|&v| f64_bits(v)).collect()
}

pub fn bits_to_doubles(bits: &[u64]) -> Vec<f64> {
    bits.iter().map(|&b| f64_from_bits(b)).collect()
}

/// 32-bit hash of an idBase tag: `h = 31·h + byte` over the UTF-8 bytes.
///
/// Part of the record format: every record names its variant by this value.
pub fn tag_hash(tag: &str) -> i32 {
    tag.bytes()
        .fold(0i32, |h, b| h.wrapping_mul(31).wrapping_add(b as i32))
}

/// One step of the content-hash accumulator: `31·h + value`.
#[inline]
pub fn hash_step(h: i32, value: i32) -> i32 {
    h.wrapping_mul(31).wrapping_add(value)
}

/// Folds a 64-bit pattern into 32 bits: `low ^ high`.
#[inline]
pub fn fold_long(value: u64) -> i32 {
    (value ^ (value >> 32)) as u32 as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── rounding ──────────────────────────────────────────────────────────

    #[test]
    fn round_off_snaps_to_five_decimals() {
        assert_eq!(round_off(0.123_454), 0.123_45);
        assert_eq!(round_off(0.123_456), 0.123_46);
        assert_eq!(round_off(42.0), 42.0);
    }

    #[test]
    fn round_off_collapses_sub_tolerance_noise() {
        assert_eq!(rounded_bits(10.0), rounded_bits(10.000_001));
        assert_ne!(rounded_bits(10.0), rounded_bits(10.000_01));
    }

    #[test]
    fn round_off_merges_f32_and_f64_sources() {
        let from_f32 = 47.3f32 as f64;
        assert_ne!(from_f32, 47.3f64);
        assert_eq!(rounded_bits(from_f32), rounded_bits(47.3));
    }

    #[test]
    fn negative_zero_is_normalized() {
        assert_eq!(rounded_bits(-0.0), rounded_bits(0.0));
        assert_eq!(rounded_bits(-0.000_001), 0.0f32.to_bits());
        assert_eq!(round_off_f64(-0.0).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn round_off_with_custom_precision() {
        assert_eq!(round_off_with(1.26, 10.0), 1.3);
    }

    // ── bit patterns ──────────────────────────────────────────────────────

    #[test]
    fn array_marshaling_is_lossless() {
        let floats = [0.0f32, -1.5, 1e-3, f32::MAX];
        assert_eq!(bits_to_floats(&floats_to_bits(&floats)), floats);

        let doubles = [0.25f64, -7.0, 1e300];
        assert_eq!(bits_to_doubles(&doubles_to_bits(&doubles)), doubles);
    }

    // ── hashing ───────────────────────────────────────────────────────────

    #[test]
    fn tag_hash_values() {
        assert_eq!(tag_hash(""), 0);
        assert_eq!(tag_hash("a"), 97);
        assert_eq!(tag_hash("ab"), 97 * 31 + 98);
        assert_eq!(tag_hash("GradientPaint"), -1_138_278_674);
    }

    #[test]
    fn tag_hash_collides_for_known_pair() {
        // Same 32-bit value; the registry has to catch this.
        assert_eq!(tag_hash("Aa"), tag_hash("BB"));
    }

    #[test]
    fn fold_long_mixes_both_halves() {
        assert_eq!(fold_long(0x0000_0001_0000_0000), 1);
        assert_eq!(fold_long(0x0000_0000_0000_0002), 2);
        assert_eq!(fold_long(0xffff_ffff_ffff_ffff), 0);
    }

    #[test]
    fn hash_step_wraps() {
        assert_eq!(hash_step(1, 2), 33);
        assert_eq!(hash_step(i32::MAX, 0), i32::MAX.wrapping_mul(31));
    }
}
