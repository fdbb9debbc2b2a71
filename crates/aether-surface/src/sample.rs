//! The per-invocation bundle handed from the vertex stage to the fragment stage.

use aether_math::safe_normalize;
use glam::{Affine3A, Vec2, Vec3};

use crate::DisplacedVertex;

/// Everything the fragment stage knows about one surface point.
///
/// Built fresh for each invocation and never mutated afterwards; the fields
/// are public for reading, and the constructors normalize the directions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    /// Object-space position (after displacement).
    pub local_position: Vec3,
    /// World-space position (after displacement).
    pub world_position: Vec3,
    /// Unit world-space shading normal.
    pub normal: Vec3,
    /// Screen-space UV in `[0, 1]²`, used by the vignette.
    pub uv: Vec2,
    /// Unit direction from the surface toward the viewer.
    pub view_dir: Vec3,
    /// Signed displacement applied by the vertex stage, object-space units.
    pub displacement: f32,
}

impl SurfaceSample {
    /// Assemble a sample from host-supplied values.
    pub fn new(
        local_position: Vec3,
        world_position: Vec3,
        normal: Vec3,
        uv: Vec2,
        view_dir: Vec3,
        displacement: f32,
    ) -> Self {
        let normal = safe_normalize(normal, Vec3::Y);
        Self {
            local_position,
            world_position,
            normal,
            uv,
            view_dir: safe_normalize(view_dir, normal),
            displacement,
        }
    }

    /// Build a sample from a displaced vertex placed in the world by a rigid
    /// `object_to_world` transform, viewed from `camera_position`.
    pub fn from_displaced(
        vertex: &DisplacedVertex,
        object_to_world: Affine3A,
        uv: Vec2,
        camera_position: Vec3,
    ) -> Self {
        let world_position = object_to_world.transform_point3(vertex.position);
        let normal = object_to_world.transform_vector3(vertex.normal);
        Self::new(
            vertex.position,
            world_position,
            normal,
            uv,
            camera_position - world_position,
            vertex.displacement,
        )
    }
}
