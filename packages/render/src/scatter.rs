//! Longitude/latitude scatter plot of individual incidents.

use crime_explore_source_models::RangeConfig;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::{Figure, RenderError, coordinate_label};

/// One dot per incident over the configured coordinate window.
pub struct Scatter<'a> {
    points: &'a [(f64, f64)],
    ranges: RangeConfig,
    title: String,
}

impl<'a> Scatter<'a> {
    /// Creates a scatter plot of `(longitude, latitude)` points.
    #[must_use]
    pub fn new(points: &'a [(f64, f64)], ranges: RangeConfig, title: impl Into<String>) -> Self {
        Self {
            points,
            ranges,
            title: title.into(),
        }
    }

    fn visible(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied().filter(|&(lon, lat)| {
            self.ranges.longitude.contains(lon) && self.ranges.latitude.contains(lat)
        })
    }
}

impl Figure for Scatter<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(RenderError::drawing)?;

        let lon = self.ranges.longitude;
        let lat = self.ranges.latitude;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 28).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(lon.min..lon.max, lat.min..lat.max)
            .map_err(RenderError::drawing)?;

        chart
            .configure_mesh()
            .light_line_style(BLACK.mix(0.05))
            .x_desc("Longitude")
            .y_desc("Latitude")
            .x_label_formatter(&|v| coordinate_label(*v))
            .y_label_formatter(&|v| coordinate_label(*v))
            .draw()
            .map_err(RenderError::drawing)?;

        chart
            .draw_series(
                self.visible()
                    .map(|point| Circle::new(point, 1, BLUE.mix(0.3).filled())),
            )
            .map_err(RenderError::drawing)?;

        Ok(())
    }
}
