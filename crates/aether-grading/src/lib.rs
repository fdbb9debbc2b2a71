//! HDR post-process color grading.
//!
//! Stages run in a fixed order (exposure, ACES tone map, soft contrast,
//! saturation, split-tone, vignette, final clamp). Named looks are
//! [`GradePreset`]s: fixed [`GradeParameters`] fed into the same [`grade`] call.

mod params;
mod stages;

pub use params::{GradeParameters, GradePreset, UnknownPresetError};
pub use stages::{
    TONEMAP_INPUT_MAX, aces_tonemap, apply_exposure, grade, saturation, soft_contrast,
    soft_contrast_channel, split_tone, vignette,
};
