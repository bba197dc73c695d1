//! Base map preparation.
//!
//! The base map is a plate carrée (equirectangular) world image. If a real
//! one for the configured style is already present in the image directory it
//! is used as-is; otherwise a blank ocean-colored base with a 30 degree
//! graticule is synthesized and written. The synthesized base doubles as the
//! blank fallback image the page falls back to when no dated plot exists.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, ImageFormat, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use tracing::info;

use crate::error::RenderError;
use crate::style::MapStyle;

/// Synthesized base map dimensions: 0.25 degrees per pixel.
pub const BASE_WIDTH: u32 = 1440;
pub const BASE_HEIGHT: u32 = 720;

const GRATICULE_STEP_DEG: f32 = 30.0;

/// Return the path of the style's base map, synthesizing it if absent.
pub fn ensure_base_map(image_dir: &Path, style: MapStyle) -> Result<PathBuf, RenderError> {
    let path = image_dir.join(style.base_map_name());
    if path.exists() {
        return Ok(path);
    }

    info!(style = %style, path = %path.display(), "Generating blank base map");
    let img = blank_base(style);
    write_png_atomic(&img, &path)?;
    Ok(path)
}

/// Blank equirectangular base: ocean fill plus a 30 degree graticule.
fn blank_base(style: MapStyle) -> RgbaImage {
    let mut img: RgbaImage =
        ImageBuffer::from_pixel(BASE_WIDTH, BASE_HEIGHT, style.ocean_color());
    let grid = style.grid_color();

    let px_per_deg_x = BASE_WIDTH as f32 / 360.0;
    let px_per_deg_y = BASE_HEIGHT as f32 / 180.0;

    // Meridians every 30 degrees
    let mut lon = -180.0f32;
    while lon <= 180.0 {
        let x = ((lon + 180.0) * px_per_deg_x).min(BASE_WIDTH as f32 - 1.0);
        draw_line_segment_mut(&mut img, (x, 0.0), (x, BASE_HEIGHT as f32 - 1.0), grid);
        lon += GRATICULE_STEP_DEG;
    }

    // Parallels every 30 degrees
    let mut lat = -90.0f32;
    while lat <= 90.0 {
        let y = ((90.0 - lat) * px_per_deg_y).min(BASE_HEIGHT as f32 - 1.0);
        draw_line_segment_mut(&mut img, (0.0, y), (BASE_WIDTH as f32 - 1.0, y), grid);
        lat += GRATICULE_STEP_DEG;
    }

    img
}

/// Write a PNG through a temp file and rename it into place, so a crash
/// mid-encode never leaves a partial image at the target path.
pub fn write_png_atomic(img: &RgbaImage, path: &Path) -> Result<(), RenderError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name));

    img.save_with_format(&tmp_path, ImageFormat::Png)
        .map_err(|e| RenderError::image(&tmp_path, e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| RenderError::io(path, e))?;
    Ok(())
}

/// Load a base map image as RGBA pixels.
pub fn load_base_map(path: &Path) -> Result<RgbaImage, RenderError> {
    let img = image::open(path).map_err(|e| RenderError::image(path, e))?;
    Ok(img.to_rgba8())
}
