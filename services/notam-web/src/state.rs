//! Application state and shared resources.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use notam_renderer::{MapRenderer, MapStyle, RenderConfig};
use notam_store::DayStore;

use crate::render_jobs::RenderTracker;

/// Service configuration resolved from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the per-day NOTAM YAML files.
    pub data_dir: PathBuf,
    /// Directory holding base maps and rendered plots.
    pub image_dir: PathBuf,
    /// Base map style.
    pub style: MapStyle,
    /// TrueType font for plot labels.
    pub font_path: PathBuf,
}

/// Shared application state.
pub struct AppState {
    pub store: DayStore,
    pub renderer: Arc<MapRenderer>,
    pub renders: RenderTracker,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let store = DayStore::open(&config.data_dir).await?;

        tokio::fs::create_dir_all(&config.image_dir).await?;
        let renderer = Arc::new(MapRenderer::new(RenderConfig {
            image_dir: config.image_dir,
            style: config.style,
            font_path: config.font_path,
        }));
        // The blank fallback image must exist before the first page load.
        renderer.ensure_base_map()?;

        Ok(Self {
            store,
            renderer,
            renders: RenderTracker::default(),
        })
    }

    /// Style of the configured base map (drives the page's fallback image).
    pub fn style(&self) -> MapStyle {
        self.renderer.config().style
    }
}
