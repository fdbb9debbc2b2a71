//! Per-vertex surface displacement and the per-invocation sample bundle.

mod displacement;
mod sample;

pub use displacement::{DisplacedVertex, DisplacementParams, SurfaceDisplacement};
pub use sample::SurfaceSample;
