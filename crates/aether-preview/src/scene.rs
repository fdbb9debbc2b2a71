//! Turns a [`Config`] into a ready-to-shade [`Compositor`] and a camera.

use aether_atmosphere::{AtmosphereParameters, ScatteringMode};
use aether_config::{Config, ScatteringSetting};
use aether_lighting::{DirectionalLight, MaterialParameters};
use aether_noise::NoiseField;
use aether_pipeline::{Compositor, ShadeInputs};
use aether_surface::{DisplacementParams, SurfaceDisplacement};
use glam::{Vec2, Vec3};

use crate::error::PreviewError;

/// Pinhole camera looking at the planet center from +Z.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    tan_half_fov: f32,
    aspect: f32,
}

impl Camera {
    /// Camera at `distance` from `target` with the given vertical field of view.
    pub fn looking_at(target: Vec3, distance: f32, fov_degrees: f32, aspect: f32) -> Self {
        let position = target + Vec3::Z * distance;
        let forward = (target - position).try_normalize().unwrap_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        Self {
            position,
            forward,
            right,
            up,
            tan_half_fov: (fov_degrees.clamp(1.0, 170.0).to_radians() * 0.5).tan(),
            aspect,
        }
    }

    /// Primary ray direction and screen UV through the center of pixel `(x, y)`.
    pub fn primary_ray(&self, x: u32, y: u32, width: u32, height: u32) -> (Vec3, Vec2) {
        let uv = Vec2::new(
            (x as f32 + 0.5) / width as f32,
            (y as f32 + 0.5) / height as f32,
        );
        let ndc = Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0);
        let dir = self.forward
            + self.right * (ndc.x * self.tan_half_fov * self.aspect)
            + self.up * (ndc.y * self.tan_half_fov);
        (dir.try_normalize().unwrap_or(self.forward), uv)
    }
}

fn invalid(msg: impl Into<String>) -> PreviewError {
    PreviewError::InvalidConfig(msg.into())
}

fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

/// Scattering mode for the configured setting.
pub fn scattering_mode(config: &Config) -> ScatteringMode {
    match config.render.scattering_mode {
        ScatteringSetting::Realtime => ScatteringMode::RealTime,
        ScatteringSetting::Integrated => {
            ScatteringMode::integrated(config.render.integration_samples)
        }
    }
}

/// Build the compositor described by `config`, rejecting values the shading
/// stages cannot accept.
pub fn build_compositor(config: &Config) -> Result<Compositor, PreviewError> {
    let atmo = &config.atmosphere;
    let radius = atmo.planet_radius;
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(invalid(format!("atmosphere.planet_radius must be positive, got {radius}")));
    }
    if !(atmo.atmosphere_radius > radius && atmo.atmosphere_radius.is_finite()) {
        return Err(invalid(format!(
            "atmosphere.atmosphere_radius ({}) must exceed planet_radius ({radius})",
            atmo.atmosphere_radius
        )));
    }

    let disp = &config.displacement;
    if !(disp.max_fraction >= 0.0 && disp.max_fraction.is_finite()) {
        return Err(invalid(format!(
            "displacement.max_fraction must be non-negative, got {}",
            disp.max_fraction
        )));
    }
    let mut displacement_params = DisplacementParams::new(radius, disp.strength, disp.max_fraction);
    displacement_params.breathing_amplitude = disp.breathing_amplitude;
    displacement_params.breathing_frequency = disp.breathing_frequency;
    displacement_params.fbm.base_frequency = disp.base_frequency;
    let displacement = SurfaceDisplacement::new(NoiseField::new(disp.seed), displacement_params);

    let mat = &config.material;
    let material = MaterialParameters {
        albedo_primary: vec3(mat.color_primary),
        albedo_secondary: vec3(mat.color_secondary),
        accent_color: vec3(mat.color_accent),
        metallic: mat.metallic.clamp(0.0, 1.0),
        rim_power: mat.rim_power,
        rim_intensity: mat.rim_intensity,
        ..MaterialParameters::rocky()
    }
    .with_roughness_range(mat.roughness_min, mat.roughness_max);

    let atmosphere = AtmosphereParameters {
        atmosphere_radius: atmo.atmosphere_radius,
        rayleigh_coeff: vec3(atmo.rayleigh_coeff),
        mie_coeff: atmo.mie_coeff,
        mie_asymmetry: atmo.mie_asymmetry,
        inner_color: vec3(atmo.inner_color),
        outer_color: vec3(atmo.outer_color),
        intensity: atmo.intensity,
        ..AtmosphereParameters::for_planet(radius)
    };

    let direction = vec3(config.sun.direction)
        .try_normalize()
        .ok_or_else(|| invalid("sun.direction must not be zero"))?;
    let light = DirectionalLight {
        direction,
        color: vec3(config.sun.color),
        intensity: config.sun.intensity,
    };

    let inputs = ShadeInputs {
        material,
        atmosphere,
        grade: config.grade.resolve()?,
        light,
        sun_orbit_period: config.sun.orbit_period_seconds,
        scattering: scattering_mode(config),
        ..ShadeInputs::default()
    };
    Ok(Compositor::new(displacement, inputs))
}

/// Camera for the configured frame size, outside the atmosphere shell.
pub fn build_camera(config: &Config) -> Result<Camera, PreviewError> {
    let (width, height) = (config.render.width, config.render.height);
    if width == 0 || height == 0 {
        return Err(invalid(format!("frame size must be non-zero, got {width}x{height}")));
    }
    let distance = config.camera.distance * config.atmosphere.planet_radius;
    if !(distance > config.atmosphere.atmosphere_radius && distance.is_finite()) {
        return Err(invalid(format!(
            "camera.distance ({}) must place the camera outside the atmosphere",
            config.camera.distance
        )));
    }
    Ok(Camera::looking_at(
        Vec3::ZERO,
        distance,
        config.camera.fov_degrees,
        width as f32 / height as f32,
    ))
}
