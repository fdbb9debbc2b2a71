//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use aether_grading::{GradeParameters, GradePreset};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Platform config directory for the renderer, e.g. `~/.config/aether`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("aether"))
}

/// Top-level renderer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Output and frame-loop settings.
    pub render: RenderConfig,
    /// Preview camera.
    pub camera: CameraConfig,
    /// The single directional light.
    pub sun: SunConfig,
    /// Surface material.
    pub material: MaterialConfig,
    /// Atmosphere shell.
    pub atmosphere: AtmosphereConfig,
    /// Vertex displacement.
    pub displacement: DisplacementConfig,
    /// Post-process grade.
    pub grade: GradeConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Which optical-depth model the atmosphere uses.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ScatteringSetting {
    /// Local-altitude density, constant cost.
    #[default]
    Realtime,
    /// Ray-marched density along the view ray.
    Integrated,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames to render.
    pub frames: u32,
    /// Clock advance between frames, in seconds.
    pub frame_dt_seconds: f64,
    /// Directory the PNG frames are written to.
    pub output_dir: PathBuf,
    /// Shading worker threads (0 = one per CPU).
    pub worker_threads: usize,
    /// Atmosphere evaluation mode.
    pub scattering_mode: ScatteringSetting,
    /// View-ray samples for the integrated mode (clamped to 8..=32).
    pub integration_samples: u32,
}

/// Camera configuration. The camera looks at the planet center.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the planet center, in planet-radius units.
    pub distance: f32,
    /// Vertical field of view.
    pub fov_degrees: f32,
}

/// Sun configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SunConfig {
    /// Direction toward the sun at t = 0. Need not be normalized.
    pub direction: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
    pub intensity: f32,
    /// Seconds per orbit about the planet's Y axis (0 = fixed sun).
    pub orbit_period_seconds: f32,
}

/// Surface material configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaterialConfig {
    pub color_primary: [f32; 3],
    pub color_secondary: [f32; 3],
    /// Rim glow color.
    pub color_accent: [f32; 3],
    pub roughness_min: f32,
    pub roughness_max: f32,
    pub metallic: f32,
    pub rim_power: f32,
    pub rim_intensity: f32,
}

/// Atmosphere configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtmosphereConfig {
    pub planet_radius: f32,
    pub atmosphere_radius: f32,
    /// Per-channel Rayleigh scattering coefficient.
    pub rayleigh_coeff: [f32; 3],
    pub mie_coeff: f32,
    /// Forward Henyey-Greenstein asymmetry `g`.
    pub mie_asymmetry: f32,
    /// Tint at the surface.
    pub inner_color: [f32; 3],
    /// Tint at the top of the shell.
    pub outer_color: [f32; 3],
    pub intensity: f32,
}

/// Displacement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplacementConfig {
    /// Noise seed.
    pub seed: u32,
    /// fBm gain before clamping, as a fraction of the radius.
    pub strength: f32,
    /// Displacement clamp, as a fraction of the radius.
    pub max_fraction: f32,
    /// Frequency of the first fBm octave.
    pub base_frequency: f32,
    /// Amplitude of the breathing envelope around 1.0.
    pub breathing_amplitude: f32,
    /// Breathing frequency in Hz.
    pub breathing_frequency: f32,
}

/// Grade configuration: a named preset plus optional per-knob overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GradeConfig {
    /// Preset name (`cinematic-sci-fi`, `warm-cinematic`, `planet-surface`).
    pub preset: String,
    pub exposure: Option<f32>,
    pub contrast: Option<f32>,
    pub saturation: Option<f32>,
    pub shadow_tint: Option<[f32; 3]>,
    pub highlight_tint: Option<[f32; 3]>,
    pub vignette_intensity: Option<f32>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            frames: 1,
            frame_dt_seconds: 1.0 / 30.0,
            output_dir: PathBuf::from("frames"),
            worker_threads: 0,
            scattering_mode: ScatteringSetting::Realtime,
            integration_samples: 16,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 3.2,
            fov_degrees: 35.0,
        }
    }
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            direction: [0.55, 0.35, 0.76],
            color: [1.0, 0.96, 0.90],
            intensity: 2.2,
            orbit_period_seconds: 0.0,
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color_primary: [0.42, 0.36, 0.31],
            color_secondary: [0.68, 0.60, 0.52],
            color_accent: [0.35, 0.6, 1.0],
            roughness_min: 0.65,
            roughness_max: 0.88,
            metallic: 0.0,
            rim_power: 3.0,
            rim_intensity: 0.6,
        }
    }
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            planet_radius: 1.0,
            atmosphere_radius: 1.1,
            rayleigh_coeff: [0.28, 0.52, 1.0],
            mie_coeff: 0.3,
            mie_asymmetry: 0.76,
            inner_color: [0.55, 0.75, 1.0],
            outer_color: [0.25, 0.35, 0.95],
            intensity: 1.4,
        }
    }
}

impl Default for DisplacementConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            strength: 0.07,
            max_fraction: 0.06,
            base_frequency: 1.6,
            breathing_amplitude: 0.008,
            breathing_frequency: 0.05,
        }
    }
}

impl Default for GradeConfig {
    fn default() -> Self {
        Self {
            preset: GradePreset::default().name().to_string(),
            exposure: None,
            contrast: None,
            saturation: None,
            shadow_tint: None,
            highlight_tint: None,
            vignette_intensity: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl GradeConfig {
    /// Resolve the preset name.
    pub fn preset(&self) -> Result<GradePreset, ConfigError> {
        Ok(self.preset.parse()?)
    }

    /// The preset's parameters with any overrides applied on top.
    pub fn resolve(&self) -> Result<GradeParameters, ConfigError> {
        let mut params = self.preset()?.parameters();
        if let Some(exposure) = self.exposure {
            params.exposure = exposure;
        }
        if let Some(contrast) = self.contrast {
            params.contrast = contrast;
        }
        if let Some(saturation) = self.saturation {
            params.saturation = saturation;
        }
        if let Some(tint) = self.shadow_tint {
            params.shadow_tint = Vec3::from_array(tint);
        }
        if let Some(tint) = self.highlight_tint {
            params.highlight_tint = Vec3::from_array(tint);
        }
        if let Some(vignette) = self.vignette_intensity {
            params.vignette_intensity = vignette;
        }
        Ok(params)
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 640"));
        assert!(ron_str.contains("scattering_mode: realtime"));
        assert!(ron_str.contains("\"planet-surface\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(render: (width: 100), grade: (preset: \"warm-cinematic\"))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.render.width, 100);
        assert_eq!(config.render.height, RenderConfig::default().height);
        assert_eq!(config.atmosphere, AtmosphereConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_integrated_mode_parses() {
        let config: Config = ron::from_str("(render: (scattering_mode: integrated))").unwrap();
        assert_eq!(config.render.scattering_mode, ScatteringSetting::Integrated);
    }

    #[test]
    fn test_grade_overrides_apply_on_top_of_preset() {
        let grade = GradeConfig {
            preset: "cinematic_sci_fi".to_string(),
            exposure: Some(2.0),
            shadow_tint: Some([0.0, 0.0, 1.0]),
            ..Default::default()
        };
        let params = grade.resolve().unwrap();
        let base = GradePreset::CinematicSciFi.parameters();
        assert_eq!(params.exposure, 2.0);
        assert_eq!(params.shadow_tint, Vec3::Z);
        assert_eq!(params.contrast, base.contrast);
        assert_eq!(params.output_max, base.output_max);
    }

    #[test]
    fn test_unknown_preset_is_an_error() {
        let grade = GradeConfig {
            preset: "sepia".to_string(),
            ..Default::default()
        };
        assert!(matches!(grade.resolve(), Err(ConfigError::UnknownPreset(_))));
    }

    #[test]
    fn test_optional_override_in_ron() {
        let config: Config =
            ron::from_str("(grade: (preset: \"planet-surface\", saturation: Some(0.5)))").unwrap();
        assert_eq!(config.grade.saturation, Some(0.5));
        assert_eq!(config.grade.resolve().unwrap().saturation, 0.5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.render.width = 1920;
        config.render.height = 1080;
        config.grade.preset = "warm-cinematic".to_string();
        config.grade.exposure = Some(1.3);

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.sun.intensity = 3.5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().sun.intensity, 3.5);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_ron_comments_preserved() {
        let ron_str = "// This is a comment\n(\n  // Another comment\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
