//! The grading stages as pure functions, and [`grade`] which chains them.

use aether_math::{REC709_LUMA, clamp_color, open_unit, safe_pow, smoothstep};
use glam::{Vec2, Vec3};

use crate::params::GradeParameters;

/// Tone-map input ceiling (half-float max); keeps the quadratic terms finite.
pub const TONEMAP_INPUT_MAX: f32 = 65504.0;

const ACES_A: f32 = 2.51;
const ACES_B: f32 = 0.03;
const ACES_C: f32 = 2.43;
const ACES_D: f32 = 0.59;
const ACES_E: f32 = 0.14;

/// Multiply by a non-negative gain.
pub fn apply_exposure(color: Vec3, exposure: f32) -> Vec3 {
    color * exposure.max(0.0)
}

fn aces_channel(x: f32) -> f32 {
    let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, TONEMAP_INPUT_MAX) };
    let mapped = (x * (ACES_A * x + ACES_B)) / (x * (ACES_C * x + ACES_D) + ACES_E);
    mapped.clamp(0.0, 1.0)
}

/// ACES filmic rational fit, per channel, into `[0, 1]`.
pub fn aces_tonemap(color: Vec3) -> Vec3 {
    Vec3::new(aces_channel(color.x), aces_channel(color.y), aces_channel(color.z))
}

/// Two-sided power S-curve pivoting on `midpoint`.
///
/// Maps 0→0, midpoint→midpoint and 1→1; `contrast = 1` is the identity.
pub fn soft_contrast_channel(x: f32, contrast: f32, midpoint: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    let m = midpoint.clamp(0.05, 0.95);
    let k = contrast.clamp(0.1, 4.0);
    if x < m {
        m * safe_pow(x / m, k)
    } else {
        1.0 - (1.0 - m) * safe_pow((1.0 - x) / (1.0 - m), k)
    }
}

/// [`soft_contrast_channel`] on each channel.
pub fn soft_contrast(color: Vec3, contrast: f32, midpoint: f32) -> Vec3 {
    Vec3::new(
        soft_contrast_channel(color.x, contrast, midpoint),
        soft_contrast_channel(color.y, contrast, midpoint),
        soft_contrast_channel(color.z, contrast, midpoint),
    )
}

/// Interpolate from Rec.709 luminance toward the full color by `amount`.
pub fn saturation(color: Vec3, amount: f32) -> Vec3 {
    let lum = Vec3::splat(color.dot(REC709_LUMA));
    lum.lerp(color, amount.max(0.0))
}

/// Blend tints into shadows and highlights through smoothstep luminance masks.
pub fn split_tone(
    color: Vec3,
    shadow_tint: Vec3,
    highlight_tint: Vec3,
    shadow_intensity: f32,
    highlight_intensity: f32,
) -> Vec3 {
    let lum = color.dot(REC709_LUMA).clamp(0.0, 1.0);
    let shadow_mask = 1.0 - smoothstep(0.0, 0.5, lum);
    let highlight_mask = smoothstep(0.5, 1.0, lum);
    let toned = color.lerp(shadow_tint, shadow_mask * shadow_intensity.clamp(0.0, 1.0));
    toned.lerp(highlight_tint, highlight_mask * highlight_intensity.clamp(0.0, 1.0))
}

/// Radial darkening factor for a screen UV, strictly inside `(0, 1)`.
///
/// Distance is normalized so the center is 0 and the corners are 1; the
/// falloff band covers the outer `smoothness` of that range.
pub fn vignette(uv: Vec2, intensity: f32, smoothness: f32) -> f32 {
    let d = (uv - Vec2::splat(0.5)).length() * std::f32::consts::SQRT_2;
    let band = smoothness.clamp(0.01, 1.0);
    let edge = smoothstep(1.0 - band, 1.0, d);
    open_unit(1.0 - intensity.clamp(0.0, 1.0) * edge)
}

/// Run the full grade on one HDR color at screen position `uv`.
pub fn grade(hdr: Vec3, uv: Vec2, params: &GradeParameters) -> Vec3 {
    let exposed = apply_exposure(hdr, params.exposure);
    let mapped = aces_tonemap(exposed);
    let contrasted = soft_contrast(mapped, params.contrast, params.contrast_midpoint);
    let saturated = saturation(contrasted, params.saturation);
    let toned = split_tone(
        clamp_color(saturated, 0.0, 1.0),
        params.shadow_tint,
        params.highlight_tint,
        params.shadow_intensity,
        params.highlight_intensity,
    );
    let vignetted = toned * vignette(uv, params.vignette_intensity, params.vignette_smoothness);

    // NaN bounds fall back to [0, 1].
    let lo = params.output_min.max(0.0).min(1.0);
    let hi = params.output_max.max(lo).min(1.0);
    clamp_color(vignetted, lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GradePreset;

    #[test]
    fn test_tonemap_zero_maps_to_zero() {
        assert_eq!(aces_tonemap(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_tonemap_monotonic_non_decreasing() {
        let mut prev = 0.0_f32;
        for i in 0..=20_000 {
            let x = i as f32 * 0.005;
            let y = aces_tonemap(Vec3::splat(x)).x;
            assert!(y >= prev, "tonemap({x}) = {y} < {prev}");
            prev = y;
        }
        let huge = aces_tonemap(Vec3::splat(1.0e6)).x;
        assert!(huge >= prev);
    }

    #[test]
    fn test_tonemap_output_in_unit_range() {
        for x in [0.0_f32, 0.18, 1.0, 16.0, 1.0e6, f32::MAX, f32::INFINITY] {
            let y = aces_tonemap(Vec3::splat(x));
            assert!(y.min_element() >= 0.0 && y.max_element() <= 1.0, "{x} -> {y:?}");
        }
    }

    #[test]
    fn test_soft_contrast_fixed_points() {
        for k in [0.5_f32, 1.0, 1.5, 3.0] {
            assert_eq!(soft_contrast_channel(0.0, k, 0.5), 0.0);
            assert!((soft_contrast_channel(1.0, k, 0.5) - 1.0).abs() < 1e-6);
            assert!((soft_contrast_channel(0.5, k, 0.5) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_soft_contrast_identity_at_one() {
        for i in 0..=10 {
            let x = i as f32 / 10.0;
            assert!((soft_contrast_channel(x, 1.0, 0.4) - x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_soft_contrast_spreads_around_midpoint() {
        let dark = soft_contrast_channel(0.3, 1.5, 0.5);
        let bright = soft_contrast_channel(0.7, 1.5, 0.5);
        assert!(dark < 0.3 && bright > 0.7);
    }

    #[test]
    fn test_zero_saturation_is_greyscale() {
        let c = saturation(Vec3::new(0.9, 0.2, 0.1), 0.0);
        assert!((c.x - c.y).abs() < 1e-6 && (c.y - c.z).abs() < 1e-6);
    }

    #[test]
    fn test_unit_saturation_is_identity() {
        let c = Vec3::new(0.9, 0.2, 0.1);
        assert!((saturation(c, 1.0) - c).length() < 1e-6);
    }

    #[test]
    fn test_split_tone_respects_masks() {
        let shadow = Vec3::new(0.0, 0.0, 1.0);
        let highlight = Vec3::new(1.0, 0.0, 0.0);
        let dark = split_tone(Vec3::splat(0.02), shadow, highlight, 0.5, 0.5);
        let bright = split_tone(Vec3::splat(0.98), shadow, highlight, 0.5, 0.5);
        assert!(dark.z > dark.x, "shadows should pick up the shadow tint: {dark:?}");
        assert!(bright.x > bright.z, "highlights should pick up the highlight tint: {bright:?}");
    }

    #[test]
    fn test_split_tone_is_continuous() {
        let shadow = Vec3::new(0.1, 0.2, 0.4);
        let highlight = Vec3::new(1.0, 0.8, 0.6);
        let mut prev = split_tone(Vec3::ZERO, shadow, highlight, 0.3, 0.3);
        for i in 1..=1000 {
            let c = split_tone(Vec3::splat(i as f32 / 1000.0), shadow, highlight, 0.3, 0.3);
            assert!((c - prev).length() < 0.01, "banding step at {i}");
            prev = c;
        }
    }

    #[test]
    fn test_vignette_center_near_one() {
        let p = GradeParameters::default();
        let center = vignette(Vec2::splat(0.5), p.vignette_intensity, p.vignette_smoothness);
        assert!((center - 1.0).abs() < 1e-3);
        assert!(center < 1.0);
    }

    #[test]
    fn test_vignette_corner_darker_than_center() {
        let p = GradeParameters::default();
        let center = vignette(Vec2::splat(0.5), p.vignette_intensity, p.vignette_smoothness);
        let corner = vignette(Vec2::ZERO, p.vignette_intensity, p.vignette_smoothness);
        assert!(corner < center);
        assert!(corner > 0.0);
    }

    #[test]
    fn test_vignette_full_intensity_never_zero() {
        let corner = vignette(Vec2::ZERO, 1.0, 1.0);
        assert!(corner > 0.0 && corner < 1.0);
    }

    #[test]
    fn test_grade_output_in_unit_range_for_adversarial_input() {
        let inputs = [
            Vec3::ZERO,
            Vec3::splat(1.0e6),
            Vec3::new(1.0e6, 0.0, 3.0),
            Vec3::new(-5.0, 0.5, 1.0e6),
            Vec3::new(0.18, 0.18, 0.18),
        ];
        let uvs = [Vec2::ZERO, Vec2::splat(0.5), Vec2::ONE, Vec2::new(2.0, -1.0)];
        for preset in GradePreset::ALL {
            let params = preset.parameters();
            for hdr in inputs {
                for uv in uvs {
                    let c = grade(hdr, uv, &params);
                    assert!(c.is_finite(), "{preset}: {hdr:?} -> {c:?}");
                    assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
                    assert!(c.min_element() >= params.output_min - 1e-6);
                    assert!(c.max_element() <= params.output_max + 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_grade_with_extreme_knobs_stays_bounded() {
        let params = GradeParameters {
            exposure: 1.0e4,
            contrast: 100.0,
            saturation: 50.0,
            shadow_intensity: 9.0,
            highlight_intensity: -3.0,
            vignette_intensity: 7.0,
            output_min: -1.0,
            output_max: 5.0,
            ..Default::default()
        };
        let c = grade(Vec3::new(3.0, 0.001, 1.0e6), Vec2::new(0.1, 0.9), &params);
        assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0, "{c:?}");
    }

    #[test]
    fn test_nan_output_range_falls_back() {
        let params = GradeParameters {
            output_min: f32::NAN,
            output_max: f32::NAN,
            ..Default::default()
        };
        for hdr in [Vec3::ZERO, Vec3::splat(0.4), Vec3::splat(1.0e6)] {
            let c = grade(hdr, Vec2::splat(0.5), &params);
            assert!(c.is_finite(), "{hdr:?} -> {c:?}");
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0, "{c:?}");
        }
    }

    #[test]
    fn test_presets_share_one_code_path() {
        let hdr = Vec3::new(0.6, 0.4, 0.3);
        let uv = Vec2::new(0.3, 0.6);
        let results: Vec<Vec3> = GradePreset::ALL
            .iter()
            .map(|p| grade(hdr, uv, &p.parameters()))
            .collect();
        assert!(results[0] != results[1] && results[1] != results[2]);
    }

    #[test]
    fn test_grade_is_deterministic() {
        let params = GradeParameters::default();
        let hdr = Vec3::new(1.3, 0.7, 0.2);
        let a = grade(hdr, Vec2::new(0.2, 0.8), &params);
        let b = grade(hdr, Vec2::new(0.2, 0.8), &params);
        assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
    }
}
