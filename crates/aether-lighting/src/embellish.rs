//! Non-physical additive terms: the fresnel rim glow and terminator forward scatter.
//!
//! Each term is clamped on its own so neither can dominate the lit surface.

use aether_math::{open_unit, safe_pow};
use glam::Vec3;

/// Per-channel ceiling of the rim glow.
pub const RIM_MAX: f32 = 1.0;

/// Per-channel ceiling of the terminator scatter.
pub const SUBSURFACE_MAX: f32 = 0.25;

/// Exponent on the forward-scatter lobe.
const FORWARD_SCATTER_POWER: f32 = 3.0;

/// `accent · fresnel^rim_power · rim_intensity` with `fresnel = 1 - N·V`.
pub fn rim_term(normal: Vec3, view_dir: Vec3, accent: Vec3, rim_power: f32, rim_intensity: f32) -> Vec3 {
    let fresnel = open_unit(1.0 - normal.dot(view_dir).clamp(0.0, 1.0));
    let glow = accent * safe_pow(fresnel, rim_power.max(0.0)) * rim_intensity.max(0.0);
    glow.clamp(Vec3::ZERO, Vec3::splat(RIM_MAX))
}

/// Light leaking through the limb when the viewer looks toward the sun:
/// `max(V·-L, 0)^3 · max(N·L, 0) · strength`.
pub fn terminator_subsurface(
    normal: Vec3,
    view_dir: Vec3,
    light_dir: Vec3,
    tint: Vec3,
    strength: f32,
) -> Vec3 {
    let forward = safe_pow(view_dir.dot(-light_dir), FORWARD_SCATTER_POWER);
    let n_dot_l = normal.dot(light_dir).max(0.0);
    let scatter = tint * (forward * n_dot_l * strength.max(0.0));
    scatter.clamp(Vec3::ZERO, Vec3::splat(SUBSURFACE_MAX))
}
