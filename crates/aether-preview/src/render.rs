//! CPU frame rendering over a pool of row workers.
//!
//! Rows are handed out through a channel and shaded in whatever order the
//! workers pick them up; the image is identical for any worker count.

use std::path::{Path, PathBuf};

use aether_atmosphere::ray_sphere_intersect;
use aether_pipeline::{Compositor, to_rgba8};
use crossbeam_channel::bounded;
use glam::Vec3;
use image::RgbaImage;

use crate::error::PreviewError;
use crate::scene::Camera;

/// Shading thread count for a config value of `requested` (0 = one per CPU).
pub fn worker_count(requested: usize, rows: u32) -> usize {
    let wanted = if requested == 0 { num_cpus::get() } else { requested };
    wanted.clamp(1, (rows as usize).max(1))
}

/// Shade one pixel: the planet if the primary ray hits the base sphere,
/// otherwise the graded atmosphere halo.
pub fn shade_pixel(
    compositor: &Compositor,
    camera: &Camera,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    time: f32,
) -> [u8; 4] {
    let (dir, uv) = camera.primary_ray(x, y, width, height);
    let atmosphere = &compositor.inputs().atmosphere;
    let hit = ray_sphere_intersect(camera.position, dir, atmosphere.center, atmosphere.planet_radius)
        .filter(|&(t_near, _)| t_near > 0.0);

    let color = match hit {
        Some((t_near, _)) => {
            let base_position = camera.position + dir * t_near - atmosphere.center;
            let base_normal = base_position.try_normalize().unwrap_or(Vec3::Y);
            compositor.shade_point(base_position, base_normal, uv, camera.position, time)
        }
        None => compositor.shade_background(camera.position, dir, uv, time),
    };
    to_rgba8(color)
}

fn shade_row(
    compositor: &Compositor,
    camera: &Camera,
    y: u32,
    width: u32,
    height: u32,
    time: f32,
) -> Vec<u8> {
    (0..width)
        .flat_map(|x| shade_pixel(compositor, camera, x, y, width, height, time))
        .collect()
}

/// Render one frame at `time` using `workers` shading threads.
pub fn render_frame(
    compositor: &Compositor,
    camera: &Camera,
    width: u32,
    height: u32,
    time: f32,
    workers: usize,
) -> Result<RgbaImage, PreviewError> {
    let rows = height as usize;
    let (row_sender, row_receiver) = bounded::<u32>(rows.max(1));
    let (result_sender, result_receiver) = bounded::<(u32, Vec<u8>)>(rows.max(1));

    for y in 0..height {
        row_sender
            .send(y)
            .map_err(|_| PreviewError::Workers("row queue closed".into()))?;
    }
    drop(row_sender);

    std::thread::scope(|scope| -> Result<(), PreviewError> {
        for i in 0..worker_count(workers, height) {
            let receiver = row_receiver.clone();
            let sender = result_sender.clone();
            std::thread::Builder::new()
                .name(format!("shade-worker-{i}"))
                .spawn_scoped(scope, move || {
                    while let Ok(y) = receiver.recv() {
                        let row = shade_row(compositor, camera, y, width, height, time);
                        if sender.send((y, row)).is_err() {
                            break;
                        }
                    }
                })?;
        }
        Ok(())
    })?;
    drop(result_sender);

    let row_bytes = width as usize * 4;
    let mut buffer = vec![0u8; row_bytes * rows];
    let mut received = 0usize;
    for (y, row) in result_receiver.iter() {
        let start = y as usize * row_bytes;
        buffer[start..start + row_bytes].copy_from_slice(&row);
        received += 1;
    }
    if received != rows {
        return Err(PreviewError::Workers(format!(
            "expected {rows} rows, received {received}"
        )));
    }

    RgbaImage::from_raw(width, height, buffer)
        .ok_or_else(|| PreviewError::Workers("frame buffer size mismatch".into()))
}

/// Path of frame `index` inside `dir`.
pub fn frame_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("frame_{index:04}.png"))
}

/// Encode `image` as PNG frame `index` in `dir`.
pub fn write_frame(image: &RgbaImage, dir: &Path, index: u32) -> Result<PathBuf, PreviewError> {
    std::fs::create_dir_all(dir)?;
    let path = frame_path(dir, index);
    image.save(&path)?;
    Ok(path)
}
