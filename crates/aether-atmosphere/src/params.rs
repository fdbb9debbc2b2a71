//! Atmosphere parameters.

use glam::Vec3;

use crate::phase::{MIE_BACKWARD_ASYMMETRY, MIE_BACKWARD_WEIGHT};

/// Physical and artistic parameters of a planet's atmosphere shell.
///
/// Distances are in the same object-space units as the planet mesh; the
/// defaults describe a unit-radius planet.
#[derive(Clone, Debug, PartialEq)]
pub struct AtmosphereParameters {
    /// Planet center in world space.
    pub center: Vec3,
    /// Inner radius: the planet's surface.
    pub planet_radius: f32,
    /// Outer radius: top of the atmosphere.
    pub atmosphere_radius: f32,
    /// Rayleigh scattering coefficients (per-wavelength, RGB).
    pub rayleigh_coeff: Vec3,
    /// Mie scattering coefficient (wavelength-independent).
    pub mie_coeff: f32,
    /// Rayleigh scale height as a fraction of the planet radius.
    pub rayleigh_scale_fraction: f32,
    /// Mie scale height as a fraction of the planet radius.
    pub mie_scale_fraction: f32,
    /// Tint near the surface.
    pub inner_color: Vec3,
    /// Tint near the top of the shell.
    pub outer_color: Vec3,
    /// Overall multiplier on the scattered light.
    pub intensity: f32,
    /// Forward Mie lobe asymmetry (Henyey-Greenstein g).
    pub mie_asymmetry: f32,
    /// Backward Mie lobe asymmetry.
    pub mie_backward_asymmetry: f32,
    /// Weight of the backward Mie lobe.
    pub mie_backward_weight: f32,
    /// Upper bound on each channel of the scattered contribution.
    pub max_contribution: f32,
}

impl Default for AtmosphereParameters {
    fn default() -> Self {
        Self::for_planet(1.0)
    }
}

impl AtmosphereParameters {
    /// Stylized thin atmosphere for a planet of the given radius.
    pub fn for_planet(planet_radius: f32) -> Self {
        Self {
            center: Vec3::ZERO,
            planet_radius,
            atmosphere_radius: planet_radius * 1.1,
            rayleigh_coeff: Vec3::new(0.28, 0.52, 1.0),
            mie_coeff: 0.3,
            rayleigh_scale_fraction: 0.08,
            mie_scale_fraction: 0.012,
            inner_color: Vec3::new(0.55, 0.75, 1.0),
            outer_color: Vec3::new(0.25, 0.35, 0.95),
            intensity: 1.4,
            mie_asymmetry: 0.76,
            mie_backward_asymmetry: MIE_BACKWARD_ASYMMETRY,
            mie_backward_weight: MIE_BACKWARD_WEIGHT,
            max_contribution: 1.5,
        }
    }

    /// Thickness of the shell. Never below a small positive floor.
    pub fn shell_thickness(&self) -> f32 {
        (self.atmosphere_radius - self.planet_radius).max(1e-6)
    }

    /// Rayleigh scale height in object-space units.
    pub fn rayleigh_scale_height(&self) -> f32 {
        (self.rayleigh_scale_fraction * self.planet_radius).max(1e-6)
    }

    /// Mie scale height in object-space units.
    pub fn mie_scale_height(&self) -> f32 {
        (self.mie_scale_fraction * self.planet_radius).max(1e-6)
    }
}
