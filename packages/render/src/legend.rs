//! Vertical color bar mapping colors back to counts.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::RenderError;
use crate::colormap::Colormap;

const STEPS: u32 = 100;

#[allow(clippy::cast_precision_loss)]
pub(crate) fn draw_color_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    colormap: Colormap,
    max: u64,
) -> Result<(), RenderError> {
    let top = max.max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .margin_top(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..top)
        .map_err(RenderError::drawing)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc("Incidents")
        .draw()
        .map_err(RenderError::drawing)?;

    chart
        .draw_series((0..STEPS).map(|k| {
            let lo = f64::from(k) / f64::from(STEPS);
            let hi = f64::from(k + 1) / f64::from(STEPS);
            Rectangle::new([(0.0, lo * top), (1.0, hi * top)], colormap.color(lo).filled())
        }))
        .map_err(RenderError::drawing)?;

    Ok(())
}
