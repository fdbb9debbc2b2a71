//! Material model and Cook-Torrance microfacet BRDF.
//!
//! `f = D·G·F / (4·N·V·N·L)` with GGX `D`, Smith/Schlick-GGX `G` and Schlick
//! `F`, plus an energy-conserving Lambertian lobe weighted by
//! `kD = (1 - F)(1 - metallic)`. Every denominator is floored and roughness
//! never drops below [`MIN_ROUGHNESS`].

use std::f32::consts::PI;

use aether_math::{DENOM_EPSILON, EDGE_EPSILON, safe_normalize, smoothstep};
use glam::Vec3;

use crate::directional::DirectionalLight;
use crate::embellish::{rim_term, terminator_subsurface};

/// Lowest roughness the BRDF accepts.
pub const MIN_ROUGHNESS: f32 = 0.02;

/// Constant ambient fill so the night side never reaches pure black.
pub const AMBIENT_FILL: f32 = 0.08;

/// Floor for the squared GGX denominator base. Small enough that it never
/// binds for roughness at or above [`MIN_ROUGHNESS`].
const GGX_BASE_EPSILON: f32 = 1e-7;

/// Dielectric reflectance at normal incidence.
const DIELECTRIC_F0: f32 = 0.04;

/// Surface material, configured once per object and read-only while shading.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialParameters {
    /// Dominant surface color (linear RGB).
    pub albedo_primary: Vec3,
    /// Secondary color blended in where the surface is raised.
    pub albedo_secondary: Vec3,
    /// Color of the rim glow and terminator scatter.
    pub accent_color: Vec3,
    /// Center of the roughness range.
    pub roughness: f32,
    /// Half-width of the roughness range swept by surface variation.
    pub roughness_variation: f32,
    /// Metallic factor \[0, 1\].
    pub metallic: f32,
    /// Exponent on the rim fresnel.
    pub rim_power: f32,
    /// Rim glow multiplier.
    pub rim_intensity: f32,
    /// Strength of the forward-scatter term near the terminator.
    pub subsurface_strength: f32,
}

impl Default for MaterialParameters {
    fn default() -> Self {
        Self::rocky()
    }
}

impl MaterialParameters {
    /// Rocky, non-metallic surface with roughness in `[0.65, 0.88]`.
    pub fn rocky() -> Self {
        Self {
            albedo_primary: Vec3::new(0.42, 0.36, 0.31),
            albedo_secondary: Vec3::new(0.68, 0.60, 0.52),
            accent_color: Vec3::new(0.35, 0.6, 1.0),
            roughness: 0.765,
            roughness_variation: 0.115,
            metallic: 0.0,
            rim_power: 3.0,
            rim_intensity: 0.6,
            subsurface_strength: 0.12,
        }
    }

    /// Build a material whose roughness sweeps `[roughness_min, roughness_max]`.
    pub fn with_roughness_range(mut self, roughness_min: f32, roughness_max: f32) -> Self {
        let (lo, hi) = if roughness_min <= roughness_max {
            (roughness_min, roughness_max)
        } else {
            (roughness_max, roughness_min)
        };
        self.roughness = 0.5 * (lo + hi);
        self.roughness_variation = 0.5 * (hi - lo);
        self
    }

    /// Roughness for a surface-variation value in `[-1, 1]`.
    pub fn roughness_at(&self, variation: f32) -> f32 {
        clamp_roughness(self.roughness + self.roughness_variation * variation.clamp(-1.0, 1.0))
    }

    /// Albedo for a surface-variation value in `[-1, 1]`.
    pub fn albedo_at(&self, variation: f32) -> Vec3 {
        let mask = smoothstep(-0.4, 0.6, variation);
        self.albedo_primary.lerp(self.albedo_secondary, mask)
    }

    /// Evaluate every surface term for one sample lit by `light`.
    ///
    /// `variation` is the normalized displacement in `[-1, 1]` and drives the
    /// albedo blend and roughness modulation.
    pub fn shade(
        &self,
        normal: Vec3,
        view_dir: Vec3,
        light: &DirectionalLight,
        variation: f32,
    ) -> SurfaceRadiance {
        let n = safe_normalize(normal, Vec3::Y);
        let v = safe_normalize(view_dir, n);
        let l = safe_normalize(light.direction, n);
        let albedo = self.albedo_at(variation);
        let roughness = self.roughness_at(variation);

        let direct =
            evaluate_brdf(l, v, n, albedo, self.metallic, roughness) * light.radiance();
        let ambient = albedo * AMBIENT_FILL;
        let rim = rim_term(n, v, self.accent_color, self.rim_power, self.rim_intensity);
        let subsurface = terminator_subsurface(
            n,
            v,
            l,
            self.accent_color.lerp(albedo, 0.5),
            self.subsurface_strength,
        );

        SurfaceRadiance {
            direct,
            ambient,
            rim,
            subsurface,
        }
    }
}

/// The separate HDR terms produced for one surface sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceRadiance {
    /// Sun light through the Cook-Torrance BRDF.
    pub direct: Vec3,
    /// Constant ambient fill.
    pub ambient: Vec3,
    /// Fresnel rim glow.
    pub rim: Vec3,
    /// Forward scatter near the terminator.
    pub subsurface: Vec3,
}

impl SurfaceRadiance {
    /// Sum of all terms.
    pub fn total(&self) -> Vec3 {
        self.direct + self.ambient + self.rim + self.subsurface
    }
}

/// Clamp roughness into `[MIN_ROUGHNESS, 1]`.
pub fn clamp_roughness(roughness: f32) -> f32 {
    roughness.clamp(MIN_ROUGHNESS, 1.0)
}

/// GGX/Trowbridge-Reitz normal distribution with `α = roughness²`.
pub fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = clamp_roughness(roughness);
    let a = a * a;
    let a2 = a * a;
    let nh = n_dot_h.clamp(0.0, 1.0);
    let base = (nh * nh * (a2 - 1.0) + 1.0).max(GGX_BASE_EPSILON);
    a2 / (PI * base * base)
}

/// Schlick-GGX geometry term for one direction, `k = (roughness + 1)² / 8`.
pub fn geometry_schlick_ggx(n_dot: f32, roughness: f32) -> f32 {
    let r = clamp_roughness(roughness) + 1.0;
    let k = (r * r) / 8.0;
    let n_dot = n_dot.clamp(0.0, 1.0);
    n_dot / (n_dot * (1.0 - k) + k).max(DENOM_EPSILON)
}

/// Smith's method: product of view and light masking.
pub fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    geometry_schlick_ggx(n_dot_v, roughness) * geometry_schlick_ggx(n_dot_l, roughness)
}

/// Schlick Fresnel, clamped strictly inside `(0, 1)` per channel.
pub fn fresnel_schlick(cos_theta: f32, f0: Vec3) -> Vec3 {
    let f = f0 + (Vec3::ONE - f0) * (1.0 - cos_theta).clamp(0.0, 1.0).powf(5.0);
    f.clamp(Vec3::splat(EDGE_EPSILON), Vec3::splat(1.0 - EDGE_EPSILON))
}

/// Cook-Torrance BRDF for one light, returning BRDF × N·L.
///
/// `light_dir` and `view_dir` point away from the surface.
pub fn evaluate_brdf(
    light_dir: Vec3,
    view_dir: Vec3,
    normal: Vec3,
    albedo: Vec3,
    metallic: f32,
    roughness: f32,
) -> Vec3 {
    let half_vec = safe_normalize(view_dir + light_dir, normal);
    let n_dot_l = normal.dot(light_dir).max(0.0);
    let n_dot_v = normal.dot(view_dir).max(0.0);
    let n_dot_h = normal.dot(half_vec).max(0.0);
    let h_dot_v = half_vec.dot(view_dir).max(0.0);
    let metallic = metallic.clamp(0.0, 1.0);

    let f0 = Vec3::splat(DIELECTRIC_F0).lerp(albedo, metallic);
    let d = distribution_ggx(n_dot_h, roughness);
    let g = geometry_smith(n_dot_v, n_dot_l, roughness);
    let f = fresnel_schlick(h_dot_v, f0);

    let specular = (d * g * f) / (4.0 * n_dot_v * n_dot_l).max(DENOM_EPSILON);
    let k_d = (Vec3::ONE - f) * (1.0 - metallic);
    let diffuse = k_d * albedo / PI;

    (diffuse + specular) * n_dot_l
}
