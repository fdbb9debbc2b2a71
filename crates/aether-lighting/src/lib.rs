//! Sun light, Cook-Torrance surface shading, and the rim/terminator embellishments.

mod directional;
pub mod embellish;
pub mod pbr;

pub use directional::{DirectionalLight, sun_direction_at};
pub use embellish::{RIM_MAX, SUBSURFACE_MAX, rim_term, terminator_subsurface};
pub use pbr::{
    AMBIENT_FILL, MIN_ROUGHNESS, MaterialParameters, SurfaceRadiance,
    clamp_roughness, distribution_ggx, evaluate_brdf, fresnel_schlick, geometry_schlick_ggx,
    geometry_smith,
};
