//! Command-line argument parsing for the Aether preview renderer.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, ScatteringSetting};

/// Aether command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "aether-preview", about = "Procedural planet preview renderer")]
pub struct CliArgs {
    /// Frame width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Frame height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of frames to render.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Grade preset (cinematic-sci-fi, warm-cinematic, planet-surface).
    #[arg(long)]
    pub preset: Option<String>,

    /// Atmosphere evaluation mode.
    #[arg(long, value_enum)]
    pub scattering: Option<ScatteringSetting>,

    /// Directory for the rendered frames.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.render.width = w;
        }
        if let Some(h) = args.height {
            self.render.height = h;
        }
        if let Some(frames) = args.frames {
            self.render.frames = frames;
        }
        if let Some(ref preset) = args.preset {
            self.grade.preset = preset.clone();
        }
        if let Some(mode) = args.scattering {
            self.render.scattering_mode = mode;
        }
        if let Some(ref dir) = args.output {
            self.render.output_dir = dir.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
