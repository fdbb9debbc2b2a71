//! Directional light: the single sun that lights the planet.

use glam::{Quat, Vec3};

/// The sun as a directional light.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Normalized direction from the surface TOWARD the sun.
    pub direction: Vec3,
    /// Linear RGB color of the light (not premultiplied by intensity).
    pub color: Vec3,
    /// Scalar intensity multiplier.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.55, 0.35, 0.76).normalize(),
            color: Vec3::new(1.0, 0.96, 0.90),
            intensity: 2.2,
        }
    }
}

impl DirectionalLight {
    /// Color × intensity.
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

/// Orbit `base_direction` about the planet's +Y axis, one turn per
/// `period_seconds`. A non-positive period leaves the direction fixed.
pub fn sun_direction_at(base_direction: Vec3, time: f32, period_seconds: f32) -> Vec3 {
    if period_seconds <= 0.0 || !period_seconds.is_finite() {
        return base_direction.normalize_or_zero();
    }
    let turns = (time / period_seconds).fract();
    let rotation = Quat::from_rotation_y(turns * std::f32::consts::TAU);
    (rotation * base_direction).normalize_or_zero()
}
