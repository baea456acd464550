#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Rendering for incident density grids and category counts.
//!
//! Each chart type implements [`Figure`], which draws onto any `plotters`
//! backend. [`render`] picks the backend from the output file extension
//! (`.png` via the bitmap backend, `.svg` via the SVG backend) and writes
//! the file once. Inputs are never mutated.

pub mod bars;
pub mod colormap;
pub mod heatmap;
mod legend;
pub mod scatter;
pub mod surface;

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

pub use bars::CategoryBars;
pub use colormap::Colormap;
pub use heatmap::Heatmap;
pub use scatter::Scatter;
pub use surface::Surface;

/// Default output image size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1200, 1000);

/// Errors that can occur while rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The output path has no recognized image extension.
    #[error("Unsupported output format for {path}: expected .png or .svg")]
    UnsupportedFormat {
        /// The rejected output path.
        path: String,
    },

    /// The drawing backend reported an error.
    #[error("Drawing failed: {0}")]
    Drawing(String),

    /// The input has nothing to draw.
    #[error("Nothing to render: {0}")]
    Empty(String),
}

impl RenderError {
    fn drawing(e: impl std::fmt::Display) -> Self {
        Self::Drawing(e.to_string())
    }
}

/// Image file formats [`render`] can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raster PNG.
    Png,
    /// Vector SVG.
    Svg,
}

impl OutputFormat {
    /// Determines the format from a file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedFormat`] for anything other than
    /// `.png` or `.svg`.
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("svg") => Ok(Self::Svg),
            _ => Err(RenderError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// A chart that can draw itself onto a `plotters` drawing area.
pub trait Figure {
    /// Draws the chart, filling the whole area.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the input is empty or the backend fails.
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError>;
}

/// Renders `figure` to `path` at the given pixel size.
///
/// # Errors
///
/// Returns [`RenderError`] if the format is unsupported, drawing fails, or
/// the file cannot be written.
pub fn render<F: Figure>(figure: &F, path: &Path, size: (u32, u32)) -> Result<(), RenderError> {
    match OutputFormat::from_path(path)? {
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            figure.draw(&root)?;
            root.present().map_err(RenderError::drawing)?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            figure.draw(&root)?;
            root.present().map_err(RenderError::drawing)?;
        }
    }

    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Formats a coordinate tick label.
fn coordinate_label(value: f64) -> String {
    format!("{value:.3}")
}
