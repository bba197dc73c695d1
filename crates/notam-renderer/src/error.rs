//! Renderer error types.

use std::path::PathBuf;

use thiserror::Error;

/// Map rendering failure.
///
/// An empty NOTAM list is not a render failure; callers branch to the blank
/// base map before invoking the renderer. On failure any previously rendered
/// artifact for the day is left untouched (output goes through a temp file
/// and is only renamed into place on success).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl RenderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}
