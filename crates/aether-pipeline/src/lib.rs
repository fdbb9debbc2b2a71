//! Per-frame composition of the planet shading stages.
//!
//! [`FrameClock`] holds the only mutable state. Everything else is a pure
//! function of a [`SurfaceSample`](aether_surface::SurfaceSample), a
//! read-only [`ShadeInputs`] and the clock's time: [`shade`] runs the lit
//! surface and the atmosphere into one HDR value and grades it for display.

mod clock;
mod compositor;

pub use clock::FrameClock;
pub use compositor::{
    Compositor, ShadeInputs, background_hdr, compose_hdr, shade, shade_background,
    surface_variation, to_rgba8,
};
