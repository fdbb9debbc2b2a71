//! Atmosphere scattering: Rayleigh + Mie single-scattering model.
//!
//! Provides [`AtmosphereParameters`], the phase functions, and
//! [`scatter`], which evaluates either the constant-cost local-altitude
//! model (the default) or the ray-marched reference model.

mod params;
mod phase;
mod scatter;

pub use params::AtmosphereParameters;
pub use phase::{
    MIE_BACKWARD_ASYMMETRY, MIE_BACKWARD_WEIGHT, PHASE_DENOM_EPSILON, dual_lobe_mie_phase,
    henyey_greenstein_phase, rayleigh_phase,
};
pub use scatter::{
    MAX_INTEGRATION_SAMPLES, MIN_INTEGRATION_SAMPLES, OpticalDepth, ScatteringMode,
    integrated_optical_depth, local_optical_depth, ray_sphere_intersect, scatter,
    sun_elevation_fade,
};
