//! Scalar and vector helpers shared by every stage of the Aether shading pipeline.
//!
//! Every helper here is total over finite input: nothing divides by an
//! unguarded value and nothing raises a negative base to a fractional power.

use glam::Vec3;

/// Smallest margin kept between a clamped factor and the hard limits 0 and 1.
///
/// Fresnel, rim and vignette factors are clamped to
/// `[EDGE_EPSILON, 1 - EDGE_EPSILON]` so they never snap to exactly 0 or 1.
pub const EDGE_EPSILON: f32 = 1e-4;

/// Floor applied to every shading denominator before division.
pub const DENOM_EPSILON: f32 = 1e-4;

/// Rec.709 luma weights.
pub const REC709_LUMA: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Hermite smoothstep between `edge0` and `edge1`.
///
/// Degenerate edges (`edge0 == edge1`) behave like a hard step at `edge0`
/// instead of dividing by zero.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span.abs() < f32::EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Clamp to `[0, 1]`.
pub fn saturate(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Clamp strictly inside the open unit interval.
pub fn open_unit(x: f32) -> f32 {
    x.clamp(EDGE_EPSILON, 1.0 - EDGE_EPSILON)
}

/// Linear interpolation.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// `powf` with the base clamped non-negative.
pub fn safe_pow(base: f32, exponent: f32) -> f32 {
    base.max(0.0).powf(exponent)
}

/// Normalize `v`, or return `fallback` when `v` has (near) zero length.
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(fallback)
}

/// Rec.709 relative luminance of a linear RGB color.
pub fn luminance(color: Vec3) -> f32 {
    color.dot(REC709_LUMA)
}

/// Component-wise clamp of a color into `[lo, hi]`.
pub fn clamp_color(color: Vec3, lo: f32, hi: f32) -> Vec3 {
    Vec3::new(
        color.x.clamp(lo, hi),
        color.y.clamp(lo, hi),
        color.z.clamp(lo, hi),
    )
}

/// Returns `true` if every component is finite.
pub fn is_finite_color(color: Vec3) -> bool {
    color.x.is_finite() && color.y.is_finite() && color.z.is_finite()
}
