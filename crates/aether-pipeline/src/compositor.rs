//! Combines the surface, atmosphere and grading stages into one shaded color.

use aether_atmosphere::{AtmosphereParameters, ScatteringMode, ray_sphere_intersect, scatter};
use aether_grading::{GradeParameters, GradePreset, grade};
use aether_lighting::{DirectionalLight, MaterialParameters, sun_direction_at};
use aether_math::{clamp_color, safe_normalize};
use aether_surface::{DisplacedVertex, DisplacementParams, SurfaceDisplacement, SurfaceSample};
use glam::{Affine3A, Vec2, Vec3};

/// Read-only parameter set for one frame of fragment shading.
#[derive(Clone, Debug)]
pub struct ShadeInputs {
    /// Surface material for the lighting stage.
    pub material: MaterialParameters,
    /// Atmosphere shell layered over the surface.
    pub atmosphere: AtmosphereParameters,
    /// Grade applied to the composed HDR color.
    pub grade: GradeParameters,
    /// Sun at t = 0.
    pub light: DirectionalLight,
    /// Seconds per sun orbit; 0 keeps the sun fixed.
    pub sun_orbit_period: f32,
    /// Optical-depth model for the atmosphere.
    pub scattering: ScatteringMode,
    /// Displacement that maps to a surface variation of ±1.
    pub displacement_bound: f32,
}

impl Default for ShadeInputs {
    fn default() -> Self {
        Self {
            material: MaterialParameters::rocky(),
            atmosphere: AtmosphereParameters::default(),
            grade: GradeParameters::default(),
            light: DirectionalLight::default(),
            sun_orbit_period: 0.0,
            scattering: ScatteringMode::RealTime,
            displacement_bound: DisplacementParams::default().max_displacement(),
        }
    }
}

impl ShadeInputs {
    /// Sun as seen at `time`.
    pub fn light_at(&self, time: f32) -> DirectionalLight {
        let base = safe_normalize(self.light.direction, Vec3::Y);
        DirectionalLight {
            direction: safe_normalize(sun_direction_at(base, time, self.sun_orbit_period), base),
            ..self.light.clone()
        }
    }
}

/// Displacement mapped into `[-1, 1]`; 0 when the bound is degenerate.
pub fn surface_variation(displacement: f32, bound: f32) -> f32 {
    if bound > 0.0 && bound.is_finite() {
        (displacement / bound).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Ungraded HDR radiance for one surface sample: the lit surface (direct,
/// ambient, rim, terminator) plus the atmosphere in front of it.
pub fn compose_hdr(sample: &SurfaceSample, inputs: &ShadeInputs, time: f32) -> Vec3 {
    let light = inputs.light_at(time);
    let variation = surface_variation(sample.displacement, inputs.displacement_bound);
    let surface = inputs
        .material
        .shade(sample.normal, sample.view_dir, &light, variation)
        .total();
    let sky = scatter(
        sample.world_position,
        sample.view_dir,
        light.direction,
        &inputs.atmosphere,
        inputs.scattering,
    );
    let hdr = surface + sky;
    if hdr.is_finite() { hdr.max(Vec3::ZERO) } else { Vec3::ZERO }
}

/// Fully shaded display color for one surface sample, in `[0, 1]`.
pub fn shade(sample: &SurfaceSample, inputs: &ShadeInputs, time: f32) -> Vec3 {
    grade(compose_hdr(sample, inputs, time), sample.uv, &inputs.grade)
}

/// Ungraded halo radiance along a camera ray that misses the planet.
///
/// The atmosphere is sampled at the ray's closest approach to the planet
/// center inside the shell; rays that miss the shell get zero.
pub fn background_hdr(ray_origin: Vec3, ray_dir: Vec3, inputs: &ShadeInputs, time: f32) -> Vec3 {
    let atmosphere = &inputs.atmosphere;
    let dir = safe_normalize(ray_dir, Vec3::NEG_Z);
    let Some((t_near, t_far)) =
        ray_sphere_intersect(ray_origin, dir, atmosphere.center, atmosphere.atmosphere_radius)
    else {
        return Vec3::ZERO;
    };
    if t_far <= 0.0 {
        return Vec3::ZERO;
    }
    let closest = (atmosphere.center - ray_origin).dot(dir);
    let t = closest.clamp(t_near.max(0.0), t_far);
    let light = inputs.light_at(time);
    scatter(ray_origin + dir * t, -dir, light.direction, atmosphere, inputs.scattering)
}

/// Display color for a background pixel: the halo (or black) through the
/// same grade as the surface, so the vignette and output range cover the
/// whole frame.
pub fn shade_background(
    ray_origin: Vec3,
    ray_dir: Vec3,
    uv: Vec2,
    inputs: &ShadeInputs,
    time: f32,
) -> Vec3 {
    grade(background_hdr(ray_origin, ray_dir, inputs, time), uv, &inputs.grade)
}

/// Quantize a display color to 8-bit RGBA with opaque alpha.
pub fn to_rgba8(color: Vec3) -> [u8; 4] {
    let c = clamp_color(color, 0.0, 1.0) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, 255]
}

/// The vertex stage plus the per-frame fragment inputs for one planet.
#[derive(Clone, Debug)]
pub struct Compositor {
    displacement: SurfaceDisplacement,
    inputs: ShadeInputs,
    object_to_world: Affine3A,
}

impl Compositor {
    /// Create a compositor. The displacement bound in `inputs` is replaced by
    /// the one implied by `displacement`.
    pub fn new(displacement: SurfaceDisplacement, mut inputs: ShadeInputs) -> Self {
        inputs.displacement_bound = displacement.params().max_displacement();
        Self {
            displacement,
            inputs,
            object_to_world: Affine3A::IDENTITY,
        }
    }

    /// Place the planet in the world. The atmosphere is re-centered on the
    /// transformed origin.
    pub fn with_object_to_world(mut self, object_to_world: Affine3A) -> Self {
        self.object_to_world = object_to_world;
        self.inputs.atmosphere.center = object_to_world.transform_point3(Vec3::ZERO);
        self
    }

    /// Fragment inputs shared by every sample of the frame.
    pub fn inputs(&self) -> &ShadeInputs {
        &self.inputs
    }

    /// The vertex stage.
    pub fn displacement(&self) -> &SurfaceDisplacement {
        &self.displacement
    }

    /// Swap the grade wholesale.
    pub fn set_grade(&mut self, grade: GradeParameters) {
        self.inputs.grade = grade;
    }

    /// Swap the grade to a named preset.
    pub fn set_preset(&mut self, preset: GradePreset) {
        self.inputs.grade = preset.parameters();
    }

    /// Switch between real-time and integrated scattering.
    pub fn set_scattering(&mut self, mode: ScatteringMode) {
        self.inputs.scattering = mode;
    }

    /// Vertex stage for one base-mesh vertex.
    pub fn vertex(&self, base_position: Vec3, base_normal: Vec3, time: f32) -> DisplacedVertex {
        self.displacement.displace(base_position, base_normal, time)
    }

    /// Build the fragment input for a displaced vertex seen from `camera_position`.
    pub fn sample(&self, vertex: &DisplacedVertex, uv: Vec2, camera_position: Vec3) -> SurfaceSample {
        SurfaceSample::from_displaced(vertex, self.object_to_world, uv, camera_position)
    }

    /// Ungraded HDR radiance of one sample.
    pub fn shade_hdr(&self, sample: &SurfaceSample, time: f32) -> Vec3 {
        compose_hdr(sample, &self.inputs, time)
    }

    /// Display color of one sample.
    pub fn shade(&self, sample: &SurfaceSample, time: f32) -> Vec3 {
        shade(sample, &self.inputs, time)
    }

    /// Display color of one sample as opaque RGBA.
    pub fn shade_rgba(&self, sample: &SurfaceSample, time: f32) -> [f32; 4] {
        self.shade(sample, time).extend(1.0).to_array()
    }

    /// Vertex and fragment stages back to back for one base-sphere point.
    pub fn shade_point(
        &self,
        base_position: Vec3,
        base_normal: Vec3,
        uv: Vec2,
        camera_position: Vec3,
        time: f32,
    ) -> Vec3 {
        let vertex = self.vertex(base_position, base_normal, time);
        let sample = self.sample(&vertex, uv, camera_position);
        self.shade(&sample, time)
    }

    /// Display color for a camera ray that misses the planet.
    pub fn shade_background(&self, ray_origin: Vec3, ray_dir: Vec3, uv: Vec2, time: f32) -> Vec3 {
        shade_background(ray_origin, ray_dir, uv, &self.inputs, time)
    }
}
