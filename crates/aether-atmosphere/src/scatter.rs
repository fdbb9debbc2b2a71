//! Single-scattering evaluation: local-altitude (real-time) and ray-marched (reference).

use aether_math::{clamp_color, safe_normalize, smoothstep};
use glam::Vec3;

use crate::params::AtmosphereParameters;
use crate::phase::{dual_lobe_mie_phase, rayleigh_phase};

/// Fewest view-ray samples the integrated model will take.
pub const MIN_INTEGRATION_SAMPLES: u32 = 8;
/// Most view-ray samples the integrated model will take.
pub const MAX_INTEGRATION_SAMPLES: u32 = 32;

/// Which optical-depth model [`scatter`] evaluates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScatteringMode {
    /// Density from the sample's own altitude. Constant cost.
    #[default]
    RealTime,
    /// Density integrated along the view ray through the shell.
    Integrated {
        /// View-ray sample count, clamped to the supported range on use.
        samples: u32,
    },
}

impl ScatteringMode {
    /// Integrated mode with the sample count clamped into range.
    pub fn integrated(samples: u32) -> Self {
        Self::Integrated {
            samples: samples.clamp(MIN_INTEGRATION_SAMPLES, MAX_INTEGRATION_SAMPLES),
        }
    }
}

/// Dimensionless Rayleigh and Mie optical depths.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OpticalDepth {
    /// Rayleigh (molecular) depth.
    pub rayleigh: f32,
    /// Mie (aerosol) depth.
    pub mie: f32,
}

/// Ray-sphere intersection returning `(t_near, t_far)`, or `None` on a miss.
///
/// `dir` must be normalized.
pub fn ray_sphere_intersect(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<(f32, f32)> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    Some((-b - sqrt_disc, -b + sqrt_disc))
}

fn altitude(position: Vec3, params: &AtmosphereParameters) -> f32 {
    ((position - params.center).length() - params.planet_radius).max(0.0)
}

fn inside_shell(position: Vec3, params: &AtmosphereParameters) -> bool {
    (position - params.center).length() <= params.atmosphere_radius
}

fn density(height: f32, params: &AtmosphereParameters) -> OpticalDepth {
    OpticalDepth {
        rayleigh: (-height / params.rayleigh_scale_height()).exp(),
        mie: (-height / params.mie_scale_height()).exp(),
    }
}

/// Density at the sample's own altitude. `None` outside the shell.
pub fn local_optical_depth(position: Vec3, params: &AtmosphereParameters) -> Option<OpticalDepth> {
    if !inside_shell(position, params) {
        return None;
    }
    Some(density(altitude(position, params), params))
}

/// Density integrated from `position` along `view_dir` to the shell boundary
/// (or the planet surface if the ray dives into it), normalized by the shell
/// thickness. `None` outside the shell.
pub fn integrated_optical_depth(
    position: Vec3,
    view_dir: Vec3,
    params: &AtmosphereParameters,
    samples: u32,
) -> Option<OpticalDepth> {
    if !inside_shell(position, params) {
        return None;
    }
    let dir = safe_normalize(view_dir, (position - params.center).normalize_or_zero());
    let (_, t_far) =
        ray_sphere_intersect(position, dir, params.center, params.atmosphere_radius)?;

    let mut t_end = t_far.max(0.0);
    if let Some((planet_near, _)) =
        ray_sphere_intersect(position, dir, params.center, params.planet_radius)
        && planet_near > 1e-4
    {
        t_end = t_end.min(planet_near);
    }

    let samples = samples.clamp(MIN_INTEGRATION_SAMPLES, MAX_INTEGRATION_SAMPLES);
    let step = t_end / samples as f32;
    let mut depth = OpticalDepth::default();
    for i in 0..samples {
        let t = (i as f32 + 0.5) * step;
        let d = density(altitude(position + dir * t, params), params);
        depth.rayleigh += d.rayleigh * step;
        depth.mie += d.mie * step;
    }

    let thickness = params.shell_thickness();
    depth.rayleigh /= thickness;
    depth.mie /= thickness;
    Some(depth)
}

/// Fraction of sunlight reaching the shell above `position`.
///
/// 1 once the sun is more than 15° above the local horizon, 0 once it is
/// more than 10° below, smooth through dawn and dusk.
pub fn sun_elevation_fade(position: Vec3, sun_dir: Vec3, params: &AtmosphereParameters) -> f32 {
    let up = safe_normalize(position - params.center, Vec3::Y);
    let sin_elevation = up.dot(safe_normalize(sun_dir, Vec3::ZERO));
    let low = (-10.0_f32).to_radians().sin();
    let high = 15.0_f32.to_radians().sin();
    smoothstep(low, high, sin_elevation)
}

/// Single-scattered radiance reaching the viewer from `position`.
///
/// `view_dir` points from the sample toward the viewer and `sun_dir` from the
/// sample toward the sun; the phase angle is their dot product. Points outside
/// the shell return zero, and the result fades out on the night side (see
/// [`sun_elevation_fade`]). Each channel is clamped to
/// `[0, params.max_contribution]`.
pub fn scatter(
    position: Vec3,
    view_dir: Vec3,
    sun_dir: Vec3,
    params: &AtmosphereParameters,
    mode: ScatteringMode,
) -> Vec3 {
    let depth = match mode {
        ScatteringMode::RealTime => local_optical_depth(position, params),
        ScatteringMode::Integrated { samples } => {
            integrated_optical_depth(position, view_dir, params, samples)
        }
    };
    let Some(depth) = depth else {
        return Vec3::ZERO;
    };

    let cos_theta = view_dir.dot(sun_dir).clamp(-1.0, 1.0);
    let phase_r = rayleigh_phase(cos_theta);
    let phase_m = dual_lobe_mie_phase(
        cos_theta,
        params.mie_asymmetry,
        params.mie_backward_asymmetry,
        params.mie_backward_weight,
    );

    let height_t = smoothstep(0.0, 1.0, altitude(position, params) / params.shell_thickness());
    let tint = params.inner_color.lerp(params.outer_color, height_t);

    let rayleigh = params.rayleigh_coeff * (phase_r * depth.rayleigh);
    let mie = Vec3::splat(params.mie_coeff * phase_m * depth.mie);
    let fade = sun_elevation_fade(position, sun_dir, params);
    let color = tint * (params.intensity * fade) * (rayleigh + mie);

    clamp_color(color, 0.0, params.max_contribution.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atmosphere_visible_from_surface() {
        let params = AtmosphereParameters::for_planet(1000.0);
        let origin = Vec3::new(0.0, params.planet_radius + 0.5, 0.0);
        let (t_near, t_far) =
            ray_sphere_intersect(origin, Vec3::Y, Vec3::ZERO, params.atmosphere_radius)
                .expect("ray from inside the shell must hit it");
        assert!(t_near < 0.0 && t_far > 0.0);
        let expected = params.atmosphere_radius - params.planet_radius - 0.5;
        assert!((t_far - expected).abs() / expected < 0.01);
    }

    #[test]
    fn test_ray_sphere_miss() {
        assert!(ray_sphere_intersect(Vec3::new(0.0, 10.0, 0.0), Vec3::X, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_outside_shell_contributes_zero() {
        let params = AtmosphereParameters::default();
        let far = Vec3::new(0.0, 0.0, params.atmosphere_radius * 1.5);
        for mode in [ScatteringMode::RealTime, ScatteringMode::integrated(16)] {
            assert_eq!(scatter(far, Vec3::Z, Vec3::Z, &params, mode), Vec3::ZERO);
        }
    }

    #[test]
    fn test_density_decreases_with_altitude() {
        let params = AtmosphereParameters::default();
        let low = local_optical_depth(Vec3::new(0.0, 1.0, 0.0), &params).unwrap();
        let high = local_optical_depth(Vec3::new(0.0, 1.05, 0.0), &params).unwrap();
        assert!(high.rayleigh < low.rayleigh);
        assert!(high.mie < low.mie);
        // Aerosols thin out far faster than air.
        assert!(high.mie / low.mie < high.rayleigh / low.rayleigh);
    }

    #[test]
    fn test_surface_density_is_one() {
        let params = AtmosphereParameters::default();
        let d = local_optical_depth(Vec3::new(1.0, 0.0, 0.0), &params).unwrap();
        assert!((d.rayleigh - 1.0).abs() < 1e-6);
        assert!((d.mie - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_forward_scatter_scenario() {
        let params = AtmosphereParameters::default();
        let p = Vec3::new(0.0, 0.0, 1.0);
        let sun = Vec3::new(0.0, 0.0, 1.0);
        let view = Vec3::new(0.0, 0.0, 1.0);
        let cos_theta = view.dot(sun);
        assert_eq!(cos_theta, 1.0);
        assert!((rayleigh_phase(cos_theta) - 0.1194).abs() < 1e-4);
        let color = scatter(p, view, sun, &params, ScatteringMode::RealTime);
        assert!(color.max_element() > 0.0);
    }

    #[test]
    fn test_noon_scatter_is_bluer_than_red() {
        let params = AtmosphereParameters {
            mie_coeff: 0.0,
            ..Default::default()
        };
        let p = Vec3::new(0.0, 1.0, 0.0);
        let c = scatter(p, Vec3::Y, Vec3::X, &params, ScatteringMode::RealTime);
        assert!(c.z > c.x, "rayleigh-only sky should be blue: {c:?}");
    }

    #[test]
    fn test_output_clamped_with_huge_coefficients() {
        let params = AtmosphereParameters {
            rayleigh_coeff: Vec3::splat(1.0e6),
            mie_coeff: 1.0e6,
            intensity: 1.0e3,
            ..Default::default()
        };
        let p = Vec3::new(0.0, 1.0, 0.0);
        for mode in [ScatteringMode::RealTime, ScatteringMode::integrated(32)] {
            let c = scatter(p, Vec3::Y, Vec3::Y, &params, mode);
            assert!(c.is_finite());
            assert!(c.max_element() <= params.max_contribution);
            assert!(c.min_element() >= 0.0);
        }
    }

    #[test]
    fn test_night_side_halo_is_dark() {
        let params = AtmosphereParameters::default();
        let day_pos = Vec3::new(0.0, 1.02, 0.0);
        let night_pos = Vec3::new(0.0, -1.02, 0.0);
        for mode in [ScatteringMode::RealTime, ScatteringMode::integrated(16)] {
            let day = scatter(day_pos, Vec3::X, Vec3::Y, &params, mode);
            let night = scatter(night_pos, Vec3::X, Vec3::Y, &params, mode);
            assert!(day.max_element() > 0.0, "{mode:?}");
            assert!(
                night.element_sum() < 0.5 * day.element_sum(),
                "{mode:?}: day {day:?} night {night:?}"
            );
        }
    }

    #[test]
    fn test_sun_elevation_fade() {
        let params = AtmosphereParameters::default();
        let p = Vec3::new(0.0, 1.05, 0.0);
        assert_eq!(sun_elevation_fade(p, Vec3::Y, &params), 1.0);
        assert_eq!(sun_elevation_fade(p, -Vec3::Y, &params), 0.0);
        let dusk = sun_elevation_fade(p, Vec3::X, &params);
        assert!(dusk > 0.0 && dusk < 1.0, "got {dusk}");
    }

    #[test]
    fn test_integrated_and_local_same_order_of_magnitude() {
        let params = AtmosphereParameters::default();
        let p = Vec3::new(0.0, 1.0, 0.0);
        let local = local_optical_depth(p, &params).unwrap();
        let integrated = integrated_optical_depth(p, Vec3::Y, &params, 32).unwrap();
        assert!(integrated.rayleigh > 0.05 * local.rayleigh);
        assert!(integrated.rayleigh <= local.rayleigh * 1.5);
    }

    #[test]
    fn test_grazing_path_is_deeper_than_zenith() {
        let params = AtmosphereParameters::default();
        let p = Vec3::new(0.0, 1.0, 0.0);
        let zenith = integrated_optical_depth(p, Vec3::Y, &params, 32).unwrap();
        let grazing =
            integrated_optical_depth(p, Vec3::new(1.0, 0.05, 0.0).normalize(), &params, 32)
                .unwrap();
        assert!(grazing.rayleigh > zenith.rayleigh);
    }

    #[test]
    fn test_integrated_sample_count_is_clamped() {
        assert_eq!(
            ScatteringMode::integrated(1),
            ScatteringMode::Integrated { samples: 8 }
        );
        assert_eq!(
            ScatteringMode::integrated(1000),
            ScatteringMode::Integrated { samples: 32 }
        );
    }

    #[test]
    fn test_default_mode_is_realtime() {
        assert_eq!(ScatteringMode::default(), ScatteringMode::RealTime);
    }

    #[test]
    fn test_scatter_is_deterministic() {
        let params = AtmosphereParameters::default();
        let p = Vec3::new(0.3, 0.9, 0.35);
        let v = Vec3::new(0.2, 0.5, 0.84).normalize();
        let s = Vec3::new(-0.4, 0.8, 0.1).normalize();
        for mode in [ScatteringMode::RealTime, ScatteringMode::integrated(12)] {
            let a = scatter(p, v, s, &params, mode);
            let b = scatter(p, v, s, &params, mode);
            assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
        }
    }
}
