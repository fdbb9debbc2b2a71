//! Noise-driven vertex displacement along the base normal.
//!
//! The displacement height is `clamp(fbm * breathing * strength, ±max_fraction)`
//! in units of the object radius. The shading normal is rebuilt from a
//! central-difference gradient of the same fBm so highlights follow the bumps.

use aether_math::safe_normalize;
use aether_noise::{FbmParams, NoiseField};
use glam::Vec3;

/// Parameters describing how far and how fast the surface moves.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementParams {
    /// Radius of the undisplaced body in object-space units.
    pub object_radius: f32,
    /// Height scale applied to the fBm, as a fraction of the radius.
    pub strength: f32,
    /// Hard bound on `|displacement|`, as a fraction of the radius.
    pub max_fraction: f32,
    /// Relative amplitude of the slow breathing envelope around 1.0.
    pub breathing_amplitude: f32,
    /// Breathing frequency in Hz.
    pub breathing_frequency: f32,
    /// Central-difference step in normalized object space.
    pub gradient_epsilon: f32,
    /// Octave setup for the height field.
    pub fbm: FbmParams,
}

impl Default for DisplacementParams {
    fn default() -> Self {
        Self {
            object_radius: 1.0,
            strength: 0.07,
            max_fraction: 0.06,
            breathing_amplitude: 0.008,
            breathing_frequency: 0.05,
            gradient_epsilon: 1e-3,
            fbm: FbmParams::default(),
        }
    }
}

impl DisplacementParams {
    /// Create parameters for a body of the given radius.
    ///
    /// # Panics
    ///
    /// Panics if `object_radius` is not positive and finite, or if
    /// `max_fraction` is negative or not finite.
    pub fn new(object_radius: f32, strength: f32, max_fraction: f32) -> Self {
        assert!(
            object_radius > 0.0 && object_radius.is_finite(),
            "object_radius must be positive and finite, got {object_radius}"
        );
        assert!(
            max_fraction >= 0.0 && max_fraction.is_finite(),
            "max_fraction must be non-negative and finite, got {max_fraction}"
        );
        Self {
            object_radius,
            strength,
            max_fraction,
            ..Default::default()
        }
    }

    /// Largest displacement (object-space units) this configuration can produce.
    pub fn max_displacement(&self) -> f32 {
        self.max_fraction * self.object_radius
    }

    /// Breathing envelope at `time`: a single low-frequency sine around 1.0.
    pub fn breathing(&self, time: f32) -> f32 {
        let phase = std::f32::consts::TAU * self.breathing_frequency * time;
        1.0 + self.breathing_amplitude * phase.sin()
    }
}

/// Result of displacing one vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplacedVertex {
    /// Displaced object-space position.
    pub position: Vec3,
    /// Unit shading normal of the bumped surface.
    pub normal: Vec3,
    /// Signed offset applied along the base normal, in object-space units.
    pub displacement: f32,
}

/// Vertex stage: evaluates the height field and rebuilt normal for a vertex.
#[derive(Clone, Debug)]
pub struct SurfaceDisplacement {
    noise: NoiseField,
    params: DisplacementParams,
}

impl SurfaceDisplacement {
    /// Create a displacement stage over the given noise field.
    pub fn new(noise: NoiseField, params: DisplacementParams) -> Self {
        Self { noise, params }
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &DisplacementParams {
        &self.params
    }

    /// Return the underlying noise field.
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Unclamped height in units of the object radius.
    fn raw_height(&self, p: Vec3, time: f32) -> f32 {
        self.noise.fbm(p, time, &self.params.fbm)
            * self.params.breathing(time)
            * self.params.strength
    }

    /// Signed displacement height at `base_position`, already clamped.
    pub fn height(&self, base_position: Vec3, time: f32) -> f32 {
        let p = base_position / self.params.object_radius;
        let bound = self.params.max_fraction;
        self.raw_height(p, time).clamp(-bound, bound) * self.params.object_radius
    }

    /// Displace one vertex along its base normal and rebuild its normal.
    ///
    /// Where the height is pinned at the bound the surface is flat, so the
    /// base normal is kept.
    pub fn displace(&self, base_position: Vec3, base_normal: Vec3, time: f32) -> DisplacedVertex {
        let n = safe_normalize(base_normal, Vec3::Y);
        let p = base_position / self.params.object_radius;
        let bound = self.params.max_fraction;
        let raw = self.raw_height(p, time);
        let displacement = raw.clamp(-bound, bound) * self.params.object_radius;
        let position = base_position + n * displacement;

        let normal = if raw.abs() >= bound {
            n
        } else {
            let gradient = self
                .noise
                .fbm_gradient(p, time, &self.params.fbm, self.params.gradient_epsilon)
                * (self.params.strength * self.params.breathing(time));
            // Only the tangential part of the slope tilts the normal.
            let tangential = gradient - n * gradient.dot(n);
            safe_normalize(n - tangential, n)
        };

        DisplacedVertex {
            position,
            normal,
            displacement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere_points() -> Vec<Vec3> {
        let mut points = Vec::new();
        for i in 0..16 {
            for j in 1..8 {
                let theta = i as f32 / 16.0 * std::f32::consts::TAU;
                let phi = j as f32 / 8.0 * std::f32::consts::PI;
                points.push(Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                ));
            }
        }
        points
    }

    #[test]
    fn test_displacement_never_exceeds_bound() {
        let stage = SurfaceDisplacement::new(NoiseField::new(7), DisplacementParams::default());
        let bound = stage.params().max_displacement();
        for time in [0.0_f32, 3.3, 1000.0, 123_456.0] {
            for p in sphere_points() {
                let v = stage.displace(p, p, time);
                assert!(
                    v.displacement.abs() <= bound + 1e-6,
                    "|{}| exceeds bound {bound} at t={time}",
                    v.displacement
                );
            }
        }
    }

    #[test]
    fn test_clamp_engages_with_extreme_strength() {
        let params = DisplacementParams::new(2.0, 50.0, 0.05);
        let stage = SurfaceDisplacement::new(NoiseField::new(3), params);
        let bound = stage.params().max_displacement();
        assert!((bound - 0.1).abs() < 1e-6);
        let saturated = sphere_points()
            .into_iter()
            .map(|p| stage.height(p * 2.0, 1.0))
            .filter(|h| (h.abs() - bound).abs() < 1e-6)
            .count();
        assert!(saturated > 0, "huge strength should saturate the clamp");
    }

    #[test]
    fn test_vertex_moves_along_base_normal() {
        let stage = SurfaceDisplacement::new(NoiseField::default(), DisplacementParams::default());
        let p = Vec3::new(0.0, 0.6, 0.8);
        let v = stage.displace(p, p, 2.0);
        let offset = v.position - p;
        assert!(
            offset.cross(p).length() < 1e-5,
            "offset {offset:?} should be parallel to the normal"
        );
        assert!((offset.length() - v.displacement.abs()).abs() < 1e-5);
    }

    #[test]
    fn test_rebuilt_normal_is_unit_and_facing_out() {
        let stage = SurfaceDisplacement::new(NoiseField::default(), DisplacementParams::default());
        for p in sphere_points() {
            let v = stage.displace(p, p, 5.0);
            assert!((v.normal.length() - 1.0).abs() < 1e-4);
            assert!(v.normal.dot(p) > 0.5, "normal should stay near the base normal");
        }
    }

    #[test]
    fn test_rebuilt_normal_differs_from_base() {
        let stage = SurfaceDisplacement::new(NoiseField::default(), DisplacementParams::default());
        let tilted = sphere_points()
            .into_iter()
            .any(|p| stage.displace(p, p, 0.0).normal.dot(p) < 0.99999);
        assert!(tilted, "bumped normals should not all equal the base normals");
    }

    #[test]
    fn test_normal_tilts_away_from_uphill() {
        // Wide bound so no sample saturates.
        let params = DisplacementParams::new(1.0, 0.07, 1.0);
        let stage = SurfaceDisplacement::new(NoiseField::new(5), params);
        let eps = 1e-3;
        let mut checked = 0;
        for p in sphere_points() {
            let tangent = p.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
            let rise = stage.height(p + tangent * eps, 0.0) - stage.height(p - tangent * eps, 0.0);
            let slope = rise / (2.0 * eps);
            if slope.abs() < 0.01 {
                continue;
            }
            let v = stage.displace(p, p, 0.0);
            assert!(
                v.normal.dot(tangent) * slope < 0.0,
                "normal {:?} should lean against slope {slope} along {tangent:?}",
                v.normal
            );
            checked += 1;
        }
        assert!(checked > 10, "only {checked} samples had a usable slope");
    }

    #[test]
    fn test_saturated_height_keeps_base_normal() {
        let params = DisplacementParams::new(1.0, 50.0, 0.05);
        let stage = SurfaceDisplacement::new(NoiseField::new(3), params);
        let bound = stage.params().max_displacement();
        let mut saturated = 0;
        for p in sphere_points() {
            let v = stage.displace(p, p, 1.0);
            if (v.displacement.abs() - bound).abs() < 1e-6 {
                assert!((v.normal - p.normalize()).length() < 1e-6, "{:?} at {p:?}", v.normal);
                saturated += 1;
            }
        }
        assert!(saturated > 0);
    }

    #[test]
    fn test_breathing_envelope_stays_near_one() {
        let params = DisplacementParams::default();
        for i in 0..200 {
            let b = params.breathing(i as f32 * 0.37);
            assert!((b - 1.0).abs() <= params.breathing_amplitude + 1e-6);
        }
    }

    #[test]
    fn test_displace_is_deterministic() {
        let stage = SurfaceDisplacement::new(NoiseField::new(11), DisplacementParams::default());
        let p = Vec3::new(0.3, 0.4, -0.866).normalize();
        let a = stage.displace(p, p, 42.0);
        let b = stage.displace(p, p, 42.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_normal_falls_back() {
        let stage = SurfaceDisplacement::new(NoiseField::default(), DisplacementParams::default());
        let v = stage.displace(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, 1.0);
        assert!(v.normal.is_finite());
        assert!(v.position.is_finite());
    }

    #[test]
    #[should_panic(expected = "object_radius must be positive")]
    fn test_zero_radius_panics() {
        DisplacementParams::new(0.0, 0.05, 0.05);
    }
}
