//! Math helpers shared by the effect stages.

use libm::{expf, log10f, powf, sqrtf, tanhf};

/// Convert decibels to linear gain.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

/// Convert linear gain to decibels. Values at or below zero map to -120 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * log10f(linear)
    }
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Feedback paths (combs, allpasses, one-pole states, delay feedback) decay
/// toward zero indefinitely; values below 1e-20 are replaced with 0.0 before
/// they reach the IEEE 754 subnormal range.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals: `dry * (1 - mix) + wet * mix`.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// Dry and wet levels for `mix`, normalized by their quadratic sum.
///
/// Returns `(dry, wet)` with `dry² + wet² = 1`, so perceived loudness stays
/// constant as the mix moves.
#[inline]
pub fn equal_power_levels(mix: f32) -> (f32, f32) {
    let dry = 1.0 - mix;
    let wet = mix;
    let total = sqrtf(dry * dry + wet * wet);
    if total > 0.0 {
        (dry / total, wet / total)
    } else {
        (dry, wet)
    }
}

/// Pitch ratio for a transposition in semitones: `2^(semitones / 12)`.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    expf(semitones / 12.0 * core::f32::consts::LN_2)
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Gentle tanh limiter whose output never exceeds `ceiling` in magnitude.
#[inline]
pub fn soft_limit(x: f32, ceiling: f32) -> f32 {
    ceiling * tanhf(x / ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_known_values() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 0.001);
        assert!((linear_to_db(1.0)).abs() < 1e-6);
        assert_eq!(linear_to_db(0.0), -120.0);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1.0), 1.0);
        assert_eq!(flush_denormal(1e-10), 1e-10);
        assert_eq!(flush_denormal(1e-21), 0.0);
        assert_eq!(flush_denormal(-1e-38), 0.0);
    }

    #[test]
    fn test_wet_dry_mix() {
        assert_eq!(wet_dry_mix(1.0, 0.5, 0.0), 1.0);
        assert_eq!(wet_dry_mix(1.0, 0.5, 1.0), 0.5);
        assert!((wet_dry_mix(0.0, 1.0, 0.3) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_equal_power_levels() {
        for &mix in &[0.0, 0.1, 0.3, 0.5, 0.9, 1.0] {
            let (dry, wet) = equal_power_levels(mix);
            assert!(
                (dry * dry + wet * wet - 1.0).abs() < 1e-5,
                "mix {} gave dry {} wet {}",
                mix,
                dry,
                wet
            );
        }
        let (dry, wet) = equal_power_levels(0.5);
        assert!((dry - wet).abs() < 1e-6);
    }

    #[test]
    fn test_semitones_to_ratio() {
        assert!((semitones_to_ratio(12.0) - 2.0).abs() < 1e-4);
        assert!((semitones_to_ratio(0.0) - 1.0).abs() < 1e-6);
        assert!((semitones_to_ratio(5.0) - 1.33484).abs() < 1e-4);
    }

    #[test]
    fn test_ms_to_samples() {
        assert_eq!(ms_to_samples(10.0, 48000.0), 480.0);
    }

    #[test]
    fn test_soft_limit_bounded() {
        for &x in &[-100.0, -1.0, 0.0, 0.5, 3.0, 1e6] {
            assert!(soft_limit(x, 0.8).abs() <= 0.8);
        }
        // Near-linear for small signals
        assert!((soft_limit(0.01, 0.8) - 0.01).abs() < 1e-4);
    }
}
