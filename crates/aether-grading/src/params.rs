//! Grade parameters and named presets.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

/// Read-only knobs for one grading pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GradeParameters {
    /// Linear gain applied before tone mapping.
    pub exposure: f32,
    /// Soft-contrast exponent. 1.0 = identity.
    pub contrast: f32,
    /// Pivot of the contrast curve.
    pub contrast_midpoint: f32,
    /// 0 = greyscale, 1 = unchanged, >1 = boosted.
    pub saturation: f32,
    /// Color blended into dark regions.
    pub shadow_tint: Vec3,
    /// Color blended into bright regions.
    pub highlight_tint: Vec3,
    /// Blend weight of the shadow tint \[0, 1\].
    pub shadow_intensity: f32,
    /// Blend weight of the highlight tint \[0, 1\].
    pub highlight_intensity: f32,
    /// Darkening at the frame corners \[0, 1\].
    pub vignette_intensity: f32,
    /// Width of the vignette falloff band \[0, 1\].
    pub vignette_smoothness: f32,
    /// Lowest displayed value.
    pub output_min: f32,
    /// Highest displayed value.
    pub output_max: f32,
}

impl Default for GradeParameters {
    fn default() -> Self {
        GradePreset::default().parameters()
    }
}

/// Named grading looks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GradePreset {
    /// Cool teal shadows, amber highlights, strong vignette.
    CinematicSciFi,
    /// Warm shadows and highlights, full display range.
    WarmCinematic,
    /// Gentle grade with an inset output range for a filmic surface look.
    #[default]
    PlanetSurface,
}

/// A preset name that does not match any [`GradePreset`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grade preset `{0}` (expected one of: cinematic-sci-fi, warm-cinematic, planet-surface)")]
pub struct UnknownPresetError(pub String);

impl GradePreset {
    /// Every preset, in declaration order.
    pub const ALL: [GradePreset; 3] = [
        GradePreset::CinematicSciFi,
        GradePreset::WarmCinematic,
        GradePreset::PlanetSurface,
    ];

    /// Canonical kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            GradePreset::CinematicSciFi => "cinematic-sci-fi",
            GradePreset::WarmCinematic => "warm-cinematic",
            GradePreset::PlanetSurface => "planet-surface",
        }
    }

    /// The fixed parameter set for this preset.
    pub fn parameters(self) -> GradeParameters {
        match self {
            GradePreset::CinematicSciFi => GradeParameters {
                exposure: 1.1,
                contrast: 1.15,
                contrast_midpoint: 0.5,
                saturation: 1.05,
                shadow_tint: Vec3::new(0.10, 0.25, 0.35),
                highlight_tint: Vec3::new(1.0, 0.80, 0.60),
                shadow_intensity: 0.18,
                highlight_intensity: 0.12,
                vignette_intensity: 0.35,
                vignette_smoothness: 0.55,
                output_min: 0.02,
                output_max: 0.97,
            },
            GradePreset::WarmCinematic => GradeParameters {
                exposure: 1.0,
                contrast: 1.1,
                contrast_midpoint: 0.5,
                saturation: 0.95,
                shadow_tint: Vec3::new(0.25, 0.15, 0.12),
                highlight_tint: Vec3::new(1.0, 0.85, 0.65),
                shadow_intensity: 0.12,
                highlight_intensity: 0.15,
                vignette_intensity: 0.3,
                vignette_smoothness: 0.6,
                output_min: 0.0,
                output_max: 1.0,
            },
            GradePreset::PlanetSurface => GradeParameters {
                exposure: 1.2,
                contrast: 1.05,
                contrast_midpoint: 0.5,
                saturation: 1.1,
                shadow_tint: Vec3::new(0.08, 0.12, 0.25),
                highlight_tint: Vec3::new(0.95, 0.92, 0.85),
                shadow_intensity: 0.15,
                highlight_intensity: 0.08,
                vignette_intensity: 0.25,
                vignette_smoothness: 0.65,
                output_min: 0.06,
                output_max: 0.88,
            },
        }
    }
}

impl fmt::Display for GradePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GradePreset {
    type Err = UnknownPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "cinematicscifi" => Ok(GradePreset::CinematicSciFi),
            "warmcinematic" => Ok(GradePreset::WarmCinematic),
            "planetsurface" => Ok(GradePreset::PlanetSurface),
            _ => Err(UnknownPresetError(s.to_string())),
        }
    }
}
