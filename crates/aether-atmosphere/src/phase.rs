//! Angular phase functions for Rayleigh and Mie scattering.
//!
//! All functions clamp `cos_theta` to `[-1, 1]` first and return finite,
//! non-negative values for any finite input.

use std::f32::consts::PI;

/// Floor applied to the Henyey-Greenstein denominator base before `powf(1.5)`.
pub const PHASE_DENOM_EPSILON: f32 = 1e-4;

/// Asymmetry of the small backward Mie lobe.
pub const MIE_BACKWARD_ASYMMETRY: f32 = -0.38;

/// Weight of the backward lobe in the dual-lobe Mie phase.
pub const MIE_BACKWARD_WEIGHT: f32 = 0.15;

/// Largest |g| accepted; `|g| = 1` collapses the lobe to a delta.
const MAX_ASYMMETRY: f32 = 0.999;

/// Rayleigh phase `3/(16π)·(1 + cos²θ)`.
pub fn rayleigh_phase(cos_theta: f32) -> f32 {
    let c = cos_theta.clamp(-1.0, 1.0);
    3.0 / (16.0 * PI) * (1.0 + c * c)
}

/// Henyey-Greenstein phase `(1 - g²) / (4π·(1 + g² - 2g·cosθ)^1.5)`.
pub fn henyey_greenstein_phase(cos_theta: f32, g: f32) -> f32 {
    let c = cos_theta.clamp(-1.0, 1.0);
    let g = g.clamp(-MAX_ASYMMETRY, MAX_ASYMMETRY);
    let g2 = g * g;
    let base = (1.0 + g2 - 2.0 * g * c).max(PHASE_DENOM_EPSILON);
    (1.0 - g2) / (4.0 * PI * base.powf(1.5))
}

/// Blend of a forward lobe (`g_forward`) and a backward lobe (`g_backward`).
///
/// `backward_weight` is clamped to `[0, 1]`; the forward lobe takes the rest.
pub fn dual_lobe_mie_phase(
    cos_theta: f32,
    g_forward: f32,
    g_backward: f32,
    backward_weight: f32,
) -> f32 {
    let w = backward_weight.clamp(0.0, 1.0);
    (1.0 - w) * henyey_greenstein_phase(cos_theta, g_forward)
        + w * henyey_greenstein_phase(cos_theta, g_backward)
}
