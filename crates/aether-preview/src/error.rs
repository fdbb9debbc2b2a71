//! Errors surfaced by the preview host.

use aether_config::ConfigError;

/// Everything that can stop a preview run.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// Config could not be resolved (e.g. unknown grade preset).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A config value is outside the range the renderer accepts.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Encoding or writing a frame failed.
    #[error("failed to write frame: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem or thread-spawn failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The shading workers did not deliver a complete frame.
    #[error("worker pool failure: {0}")]
    Workers(String),
}
