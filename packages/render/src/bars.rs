//! Bar chart of incidents per category.

use crime_explore_analysis::summary::CategoryCount;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::{Figure, RenderError};

/// One bar per category, in the order given.
pub struct CategoryBars<'a> {
    counts: &'a [CategoryCount],
    title: String,
}

impl<'a> CategoryBars<'a> {
    /// Creates a bar chart from per-category counts.
    #[must_use]
    pub fn new(counts: &'a [CategoryCount], title: impl Into<String>) -> Self {
        Self {
            counts,
            title: title.into(),
        }
    }

    fn label(&self, segment: &SegmentValue<usize>) -> String {
        match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => self
                .counts
                .get(*i)
                .map(|c| c.category.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        }
    }
}

/// Y-axis ceiling with ~10% headroom above the tallest bar.
const fn headroom(max: u64) -> u64 {
    max + max / 10 + 1
}

impl Figure for CategoryBars<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        if self.counts.is_empty() {
            return Err(RenderError::Empty("no categories to chart".to_string()));
        }

        root.fill(&WHITE).map_err(RenderError::drawing)?;

        let n = self.counts.len();
        let max = self.counts.iter().map(|c| c.count).max().unwrap_or(0);

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 28).into_font())
            .margin(20)
            .x_label_area_size(260)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), 0..headroom(max))
            .map_err(RenderError::drawing)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_label_formatter(&|segment| self.label(segment))
            .y_desc("Incidents")
            .draw()
            .map_err(RenderError::drawing)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BLUE.mix(0.7).filled())
                    .margin(2)
                    .data(self.counts.iter().enumerate().map(|(i, c)| (i, c.count))),
            )
            .map_err(RenderError::drawing)?;

        Ok(())
    }
}
