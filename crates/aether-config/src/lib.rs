//! Configuration for the Aether planet renderer.
//!
//! Settings persist to disk as `config.ron` and can be overridden from the
//! command line. Every section tolerates missing and unknown fields so older
//! and newer config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AtmosphereConfig, CameraConfig, Config, DebugConfig, DisplacementConfig, GradeConfig,
    MaterialConfig, RenderConfig, ScatteringSetting, SunConfig, default_config_dir,
};
pub use error::ConfigError;
