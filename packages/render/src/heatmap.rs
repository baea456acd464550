//! 2D heatmap of an occupancy grid.
//!
//! Longitude runs along x and latitude along y with north up, so the image
//! reads like a map. Each cell is a rectangle spanning its bin; the open
//! last bin is drawn one edge-step wide.

use crime_explore_analysis_models::{BinEdges, Binning};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::colormap::{Colormap, intensity};
use crate::legend::draw_color_bar;
use crate::{Figure, RenderError, coordinate_label};

/// Width used for a bin when the axis has a single edge.
const SINGLE_BIN_WIDTH: f64 = 1.0;

/// A heatmap of a [`Binning`].
pub struct Heatmap<'a> {
    binning: &'a Binning,
    title: String,
    colormap: Colormap,
}

impl<'a> Heatmap<'a> {
    /// Creates a heatmap with the default colormap.
    #[must_use]
    pub fn new(binning: &'a Binning, title: impl Into<String>) -> Self {
        Self {
            binning,
            title: title.into(),
            colormap: Colormap::default(),
        }
    }

    /// Overrides the colormap.
    #[must_use]
    pub const fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }
}

/// Returns `[lo, hi)` bounds for every bin on one axis.
pub(crate) fn cell_bounds(edges: &BinEdges) -> Vec<(f64, f64)> {
    let values = edges.values();
    let step = edges.step().unwrap_or(SINGLE_BIN_WIDTH);
    values
        .iter()
        .enumerate()
        .map(|(k, &lo)| (lo, values.get(k + 1).copied().unwrap_or(lo + step)))
        .collect()
}

/// Full extent covered by [`cell_bounds`].
pub(crate) fn extent(cells: &[(f64, f64)]) -> Option<std::ops::Range<f64>> {
    Some(cells.first()?.0..cells.last()?.1)
}

impl Figure for Heatmap<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let x_cells = cell_bounds(&self.binning.x_edges);
        let y_cells = cell_bounds(&self.binning.y_edges);
        let (Some(x_range), Some(y_range)) = (extent(&x_cells), extent(&y_cells)) else {
            return Err(RenderError::Empty("grid has no bins".to_string()));
        };

        root.fill(&WHITE).map_err(RenderError::drawing)?;
        let (width, _) = root.dim_in_pixel();
        let (plot_area, legend_area) = root.split_horizontally(width * 85 / 100);

        let mut chart = ChartBuilder::on(&plot_area)
            .caption(&self.title, ("sans-serif", 28).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, y_range)
            .map_err(RenderError::drawing)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .x_label_formatter(&|v| coordinate_label(*v))
            .y_label_formatter(&|v| coordinate_label(*v))
            .draw()
            .map_err(RenderError::drawing)?;

        let grid = &self.binning.grid;
        let max = grid.max();
        let colormap = self.colormap;
        let (x_cells, y_cells) = (&x_cells, &y_cells);

        chart
            .draw_series(grid.rows().enumerate().flat_map(|(i, row)| {
                row.iter().enumerate().map(move |(j, &count)| {
                    let (x0, x1) = x_cells[i];
                    let (y0, y1) = y_cells[j];
                    Rectangle::new(
                        [(x0, y0), (x1, y1)],
                        colormap.color(intensity(count, max)).filled(),
                    )
                })
            }))
            .map_err(RenderError::drawing)?;

        draw_color_bar(&legend_area, colormap, max)
    }
}
