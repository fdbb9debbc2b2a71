//! Offline preview host for the planet shading pipeline.
//!
//! Owns the frame clock, shades every pixel of each frame on a worker pool
//! and writes the frames as PNG files.

mod error;
mod render;
mod scene;

use std::path::PathBuf;
use std::time::Instant;

use aether_config::{CliArgs, Config, default_config_dir};
use aether_pipeline::FrameClock;
use clap::Parser;
use tracing::{debug, info};

use crate::error::PreviewError;

fn run(config: &Config) -> Result<(), PreviewError> {
    let preset = config.grade.preset()?;
    let compositor = scene::build_compositor(config)?;
    let camera = scene::build_camera(config)?;
    let settings = &config.render;
    let workers = render::worker_count(settings.worker_threads, settings.height);

    info!(
        width = settings.width,
        height = settings.height,
        frames = settings.frames,
        preset = %preset,
        scattering = ?compositor.inputs().scattering,
        workers,
        "Rendering planet preview"
    );
    debug!(?config, "Resolved configuration");

    let mut clock = FrameClock::new();
    for index in 0..settings.frames {
        let started = Instant::now();
        let time = clock.seconds();
        let image = render::render_frame(
            &compositor,
            &camera,
            settings.width,
            settings.height,
            time,
            workers,
        )?;
        let path = render::write_frame(&image, &settings.output_dir, index)?;
        info!(
            frame = index,
            time,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Wrote {}",
            path.display()
        );
        clock.tick(settings.frame_dt_seconds);
    }

    info!(frames = clock.frame(), "Preview complete");
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".aether"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    aether_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&config) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
