//! Map rendering for daily NOTAM plots.
//!
//! Given a day's validated NOTAM list, draws one circular great-circle
//! footprint per NOTAM over an equirectangular base map, labels each with
//! its ident, and writes the composed raster to
//! `<image_dir>/<YYYY-MM-DD>_notams.png`. Output is atomic: the image is
//! encoded to a temp file and renamed into place only on success, so a
//! failed render leaves any previous artifact for the day untouched.

pub mod basemap;
pub mod error;
pub mod geo;
pub mod style;

use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use rusttype::{Font, Scale};
use tracing::{debug, info, warn};

use notam_common::{DayKey, Notam};

pub use basemap::ensure_base_map;
pub use error::RenderError;
pub use style::MapStyle;

const RING_COLOR: Rgba<u8> = Rgba([220, 20, 20, 255]);
const LABEL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LABEL_OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LABEL_SIZE: f32 = 14.0;
const TITLE_SIZE: f32 = 18.0;

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory where base maps and rendered plots live.
    pub image_dir: PathBuf,
    /// Base map style to draw over.
    pub style: MapStyle,
    /// TrueType font used for ident labels and the title.
    pub font_path: PathBuf,
}

/// Draws daily NOTAM plots.
///
/// The label font is loaded once at construction; when it cannot be loaded
/// the renderer logs a warning and draws unlabeled footprints.
pub struct MapRenderer {
    config: RenderConfig,
    font: Option<Font<'static>>,
}

impl MapRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let font = match std::fs::read(&config.font_path) {
            Ok(data) => {
                let font = Font::try_from_vec(data);
                if font.is_none() {
                    warn!(path = %config.font_path.display(), "Font file is not a usable TrueType font; labels disabled");
                }
                font
            }
            Err(e) => {
                warn!(path = %config.font_path.display(), error = %e, "Label font not found; rendering without labels");
                None
            }
        };
        Self { config, font }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Path the day's rendered plot is written to.
    pub fn image_path(&self, day: DayKey) -> PathBuf {
        self.config.image_dir.join(day.image_name())
    }

    /// Make sure the configured style's base map exists, returning its path.
    ///
    /// Called at startup so the blank fallback image is always available to
    /// the page, and again before each render.
    pub fn ensure_base_map(&self) -> Result<PathBuf, RenderError> {
        basemap::ensure_base_map(&self.config.image_dir, self.config.style)
    }

    /// Render the day's plot.
    ///
    /// An empty list renders the bare base map with a title; it is never an
    /// error (callers normally branch to the blank base map instead of
    /// invoking the renderer at all).
    pub fn render_day(&self, day: DayKey, notams: &[Notam]) -> Result<PathBuf, RenderError> {
        let base_path = self.ensure_base_map()?;
        let mut img = basemap::load_base_map(&base_path)?;

        for notam in notams {
            self.draw_footprint(&mut img, notam);
        }
        for notam in notams {
            self.draw_label(&mut img, notam);
        }
        self.draw_title(&mut img, day);

        let out_path = self.image_path(day);
        basemap::write_png_atomic(&img, &out_path)?;
        info!(day = %day, count = notams.len(), path = %out_path.display(), "Rendered NOTAM plot");
        Ok(out_path)
    }

    fn draw_footprint(&self, img: &mut RgbaImage, notam: &Notam) {
        let (width, height) = img.dimensions();
        let ring = geo::footprint_ring(notam.lat_deg(), notam.lon_deg(), notam.radius_nm());
        let px: Vec<(f32, f32)> = ring
            .iter()
            .map(|&(lat, lon)| project(lat, lon, width, height))
            .collect();

        for i in 0..px.len() {
            let (x0, y0) = px[i];
            let (x1, y1) = px[(i + 1) % px.len()];
            // A segment jumping more than half the map width crosses the
            // antimeridian; drawing it would streak across the whole map.
            if (x1 - x0).abs() > width as f32 / 2.0 {
                continue;
            }
            draw_line_segment_mut(img, (x0, y0), (x1, y1), RING_COLOR);
        }
        debug!(ident = %notam.ident(), radius_nm = notam.radius_nm(), "Drew footprint");
    }

    fn draw_label(&self, img: &mut RgbaImage, notam: &Notam) {
        let Some(font) = &self.font else {
            return;
        };
        let (width, height) = img.dimensions();
        let (cx, cy) = project(notam.lat_deg(), notam.lon_deg(), width, height);
        self.draw_outlined_text(img, font, notam.ident(), LABEL_SIZE, cx, cy);
    }

    fn draw_title(&self, img: &mut RgbaImage, day: DayKey) {
        let Some(font) = &self.font else {
            return;
        };
        let (width, _) = img.dimensions();
        let title = format!("{} NOTAMs", day);
        self.draw_outlined_text(
            img,
            font,
            &title,
            TITLE_SIZE,
            width as f32 / 2.0,
            TITLE_SIZE,
        );
    }

    /// Draw text centered at `(cx, cy)`, white over a dark offset outline so
    /// labels stay readable on any base map.
    fn draw_outlined_text(
        &self,
        img: &mut RgbaImage,
        font: &Font<'static>,
        text: &str,
        size: f32,
        cx: f32,
        cy: f32,
    ) {
        let scale = Scale::uniform(size);
        let char_width = size * 0.6;
        let x = (cx - text.len() as f32 * char_width / 2.0) as i32;
        let y = (cy - size / 2.0) as i32;

        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            draw_text_mut(img, LABEL_OUTLINE, x + dx, y + dy, scale, font, text);
        }
        draw_text_mut(img, LABEL_COLOR, x, y, scale, font, text);
    }
}

/// Plate carrée projection: longitude/latitude to pixel coordinates.
fn project(lat_deg: f64, lon_deg: f64, width: u32, height: u32) -> (f32, f32) {
    // Wrap longitude into [-180, 180); footprint points near the
    // antimeridian can come back outside that range.
    let lon = lon_deg - 360.0 * ((lon_deg + 180.0) / 360.0).floor();
    let x = (lon + 180.0) / 360.0 * f64::from(width);
    let y = (90.0 - lat_deg) / 180.0 * f64::from(height);
    (x as f32, y as f32)
}
