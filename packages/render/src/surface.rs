//! 3D surface of an occupancy grid.
//!
//! The surface is sampled at the bin edges, so vertex `(lon_k, lat_l)`
//! carries the count of cell `(k, l)`. Height is drawn on the vertical
//! axis with ten labelled divisions.

use crime_explore_analysis_models::Binning;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::colormap::Colormap;
use crate::legend::draw_color_bar;
use crate::{Figure, RenderError, coordinate_label};

/// Labelled divisions on the count axis.
const COUNT_AXIS_LABELS: usize = 10;

/// A 3D surface plot of a [`Binning`].
pub struct Surface<'a> {
    binning: &'a Binning,
    title: String,
    colormap: Colormap,
    pitch: f64,
    yaw: f64,
}

impl<'a> Surface<'a> {
    /// Creates a surface with a cool-warm colormap and a default camera.
    #[must_use]
    pub fn new(binning: &'a Binning, title: impl Into<String>) -> Self {
        Self {
            binning,
            title: title.into(),
            colormap: Colormap::CoolWarm,
            pitch: 0.6,
            yaw: 0.7,
        }
    }

    /// Overrides the colormap.
    #[must_use]
    pub const fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    /// Overrides the camera angles (radians).
    #[must_use]
    pub const fn with_camera(mut self, pitch: f64, yaw: f64) -> Self {
        self.pitch = pitch;
        self.yaw = yaw;
        self
    }
}

/// Count of the cell whose lower-left vertex is `(lon, lat)`. Both values
/// must be exact edge values.
fn count_at(binning: &Binning, lon: f64, lat: f64) -> u64 {
    // An edge value has exactly its own index of edges strictly below it.
    let i = binning.x_edges.values().partition_point(|e| *e < lon);
    let j = binning.y_edges.values().partition_point(|e| *e < lat);
    binning.grid.get(i, j).unwrap_or(0)
}

impl Figure for Surface<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let xs = self.binning.x_edges.values();
        let ys = self.binning.y_edges.values();
        let (Some(&x_lo), Some(&x_hi), Some(&y_lo), Some(&y_hi)) =
            (xs.first(), xs.last(), ys.first(), ys.last())
        else {
            return Err(RenderError::Empty("grid has no bins".to_string()));
        };
        if xs.len() < 2 || ys.len() < 2 {
            return Err(RenderError::Empty(
                "a surface needs at least 2 bins per axis".to_string(),
            ));
        }

        root.fill(&WHITE).map_err(RenderError::drawing)?;
        let (width, _) = root.dim_in_pixel();
        let (plot_area, legend_area) = root.split_horizontally(width * 85 / 100);

        let max = self.binning.grid.max();
        let top = max.max(1) as f64;

        let mut chart = ChartBuilder::on(&plot_area)
            .caption(&self.title, ("sans-serif", 28).into_font())
            .margin(20)
            .build_cartesian_3d(x_lo..x_hi, 0.0..top, y_lo..y_hi)
            .map_err(RenderError::drawing)?;

        let (pitch, yaw) = (self.pitch, self.yaw);
        chart.with_projection(|mut pb| {
            pb.pitch = pitch;
            pb.yaw = yaw;
            pb.scale = 0.8;
            pb.into_matrix()
        });

        chart
            .configure_axes()
            .light_grid_style(BLACK.mix(0.15))
            .max_light_lines(3)
            .y_labels(COUNT_AXIS_LABELS)
            .x_formatter(&|v| coordinate_label(*v))
            .y_formatter(&|v| format!("{v:.02}"))
            .z_formatter(&|v| coordinate_label(*v))
            .draw()
            .map_err(RenderError::drawing)?;

        let colormap = self.colormap;
        chart
            .draw_series(
                SurfaceSeries::xoz(xs.iter().copied(), ys.iter().copied(), |lon, lat| {
                    count_at(self.binning, lon, lat) as f64
                })
                .style_func(&|&height| colormap.color(height / top).filled()),
            )
            .map_err(RenderError::drawing)?;

        draw_color_bar(&legend_area, colormap, max)
    }
}
