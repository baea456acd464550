//! Two-dimensional spatial bucketing.
//!
//! Points are assigned to right-open bins `[edge_k, edge_k+1)` using the
//! rule "number of edges strictly less than the value, minus one". Values
//! at or below the first edge compute to index `-1` and are handled by the
//! caller's [`UnderflowPolicy`]. Values above the last edge stay in the
//! last bin.

use crime_explore_analysis_models::{
    Axis, AxisRange, BinEdges, Binning, BinningStats, OccupancyGrid, UnderflowPolicy,
};
use crime_explore_source_models::{IncidentRecord, RangeConfig};

/// Errors that can occur during binning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BinningError {
    /// Zero bins, or more than [`MAX_NUM_BINS`], requested.
    #[error("num_bins must be between 1 and {MAX_NUM_BINS}")]
    InvalidBinCount,

    /// Range bounds are non-finite, not increasing, or too close together
    /// to produce strictly increasing edges.
    #[error(
        "{axis} range [{min}, {max}] must be finite with min < max and wide enough for distinct bin edges"
    )]
    InvalidRange {
        /// Which axis the range belongs to.
        axis: Axis,
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },

    /// A point fell at or below the first edge under
    /// [`UnderflowPolicy::Reject`].
    #[error("{axis} value {value} is at or below the first bin edge")]
    Underflow {
        /// Which axis underflowed.
        axis: Axis,
        /// The offending coordinate.
        value: f64,
    },
}

/// Largest accepted grid resolution per axis.
pub const MAX_NUM_BINS: usize = 4096;

/// Returns `num` evenly spaced values from `range.min` to `range.max`
/// inclusive. The last value is exactly `range.max`; with `num == 1` the
/// only value is `range.min`.
///
/// Edges are `min + k * step`. When the span itself overflows to infinity
/// they are interpolated between the bounds instead, which stays finite.
/// Very narrow ranges may still yield repeated edges; [`bin_points`]
/// rejects those.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::suboptimal_flops)]
pub fn linspace(range: AxisRange, num: usize) -> BinEdges {
    let values = match num {
        0 => Vec::new(),
        1 => vec![range.min],
        _ => {
            let last = (num - 1) as f64;
            let step = range.span() / last;
            let mut values: Vec<f64> = if step.is_finite() {
                (0..num).map(|k| range.min + k as f64 * step).collect()
            } else {
                (0..num)
                    .map(|k| {
                        let t = k as f64 / last;
                        range.min.mul_add(1.0 - t, range.max * t)
                    })
                    .collect()
            };
            values[num - 1] = range.max;
            values
        }
    };
    BinEdges::from_values(values)
}

/// Builds the edges for one axis, rejecting ranges that cannot be split
/// into `num_bins` strictly increasing edges.
fn axis_edges(range: AxisRange, num_bins: usize, axis: Axis) -> Result<BinEdges, BinningError> {
    let edges = linspace(range, num_bins);
    if edges.values().windows(2).all(|w| w[0] < w[1]) {
        Ok(edges)
    } else {
        Err(BinningError::InvalidRange {
            axis,
            min: range.min,
            max: range.max,
        })
    }
}

/// Where a single coordinate landed on one axis.
struct AxisAssignment {
    index: usize,
    underflow: bool,
    overflow: bool,
}

fn assign(
    edges: &BinEdges,
    value: f64,
    axis: Axis,
    policy: UnderflowPolicy,
) -> Result<AxisAssignment, BinningError> {
    let raw = edges.raw_index(value);
    if raw < 0 {
        return match policy {
            UnderflowPolicy::Clamp => Ok(AxisAssignment {
                index: 0,
                underflow: true,
                overflow: false,
            }),
            UnderflowPolicy::Reject => Err(BinningError::Underflow { axis, value }),
        };
    }

    #[allow(clippy::cast_sign_loss)]
    let index = raw as usize;
    let overflow = edges.values().last().is_some_and(|last| value > *last);

    Ok(AxisAssignment {
        index,
        underflow: false,
        overflow,
    })
}

fn check_range(range: AxisRange, axis: Axis) -> Result<(), BinningError> {
    if range.is_valid() {
        Ok(())
    } else {
        Err(BinningError::InvalidRange {
            axis,
            min: range.min,
            max: range.max,
        })
    }
}

/// Counts `(x, y)` points into a `num_bins x num_bins` grid over the given
/// ranges.
///
/// Points with a non-finite coordinate are skipped and counted in
/// [`BinningStats::skipped_non_finite`].
///
/// # Errors
///
/// Returns [`BinningError::InvalidBinCount`] for `num_bins` outside
/// `1..=MAX_NUM_BINS`, [`BinningError::InvalidRange`] for a malformed range
/// or one too narrow for distinct edges, and
/// [`BinningError::Underflow`] for the first point at or below a range
/// minimum when `policy` is [`UnderflowPolicy::Reject`].
pub fn bin_points<I>(
    points: I,
    x_range: AxisRange,
    y_range: AxisRange,
    num_bins: usize,
    policy: UnderflowPolicy,
) -> Result<Binning, BinningError>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    if !(1..=MAX_NUM_BINS).contains(&num_bins) {
        return Err(BinningError::InvalidBinCount);
    }
    check_range(x_range, Axis::X)?;
    check_range(y_range, Axis::Y)?;

    let x_edges = axis_edges(x_range, num_bins, Axis::X)?;
    let y_edges = axis_edges(y_range, num_bins, Axis::Y)?;
    let mut grid = OccupancyGrid::try_zeros(num_bins).ok_or(BinningError::InvalidBinCount)?;
    let mut stats = BinningStats::default();

    for (x, y) in points {
        if !x.is_finite() || !y.is_finite() {
            stats.skipped_non_finite += 1;
            continue;
        }

        let i = assign(&x_edges, x, Axis::X, policy)?;
        let j = assign(&y_edges, y, Axis::Y, policy)?;

        grid.increment(i.index, j.index);
        stats.binned += 1;
        if i.underflow || j.underflow {
            stats.underflow_clamped += 1;
        }
        if i.overflow || j.overflow {
            stats.overflow += 1;
        }
    }

    if stats.underflow_clamped > 0 {
        log::warn!(
            "{} point(s) at or below a range minimum were clamped into bin 0",
            stats.underflow_clamped
        );
    }
    if stats.skipped_non_finite > 0 {
        log::warn!(
            "{} point(s) with non-finite coordinates were skipped",
            stats.skipped_non_finite
        );
    }
    log::debug!(
        "Binned {} point(s) into {num_bins}x{num_bins} grid ({} beyond range maximum)",
        stats.binned,
        stats.overflow
    );

    Ok(Binning {
        grid,
        x_edges,
        y_edges,
        stats,
    })
}

/// Bins filtered incidents by (longitude, latitude) over the configured
/// ranges.
///
/// Records without both coordinates are ignored; run them through
/// [`crate::filter::filter_incidents`] first.
///
/// # Errors
///
/// See [`bin_points`].
pub fn histogram_bins_by_lat_long(
    records: &[&IncidentRecord],
    ranges: &RangeConfig,
    num_bins: usize,
    policy: UnderflowPolicy,
) -> Result<Binning, BinningError> {
    bin_points(
        records.iter().filter_map(|record| record.coordinates()),
        ranges.longitude,
        ranges.latitude,
        num_bins,
        policy,
    )
}

#[cfg(test)]
mod tests {
    use crime_explore_categories::AllowList;
    use crime_explore_source_models::{LAT_RANGE, LON_RANGE};

    use crate::filter::filter_incidents;

    use super::*;

    const UNIT: AxisRange = AxisRange::new(0.0, 10.0);

    fn bin(points: &[(f64, f64)], num_bins: usize, policy: UnderflowPolicy) -> Binning {
        bin_points(points.iter().copied(), UNIT, UNIT, num_bins, policy).unwrap()
    }

    #[test]
    fn linspace_matches_endpoints() {
        let edges = linspace(UNIT, 5);
        assert_eq!(edges.values(), &[0.0, 2.5, 5.0, 7.5, 10.0]);
        assert_eq!(linspace(UNIT, 1).values(), &[0.0]);
        assert!(linspace(UNIT, 0).is_empty());
    }

    #[test]
    fn edges_have_num_bins_entries_and_strictly_increase() {
        for num_bins in [2, 3, 10, 50, 200] {
            let binning = bin_points(
                std::iter::empty(),
                LON_RANGE,
                LAT_RANGE,
                num_bins,
                UnderflowPolicy::Clamp,
            )
            .unwrap();
            for edges in [&binning.x_edges, &binning.y_edges] {
                assert_eq!(edges.len(), num_bins);
                assert!(
                    edges.values().windows(2).all(|w| w[0] < w[1]),
                    "edges not strictly increasing for {num_bins} bins"
                );
            }
            assert_eq!(binning.grid.num_bins(), num_bins);
            assert_eq!(binning.grid.rows().count(), num_bins);
        }
    }

    #[test]
    fn interior_points_counted_exactly_once() {
        let points = [(1.0, 1.0), (4.9, 5.1), (5.1, 4.9), (9.9, 9.9), (2.0, 8.0)];
        let binning = bin(&points, 2, UnderflowPolicy::Reject);
        assert_eq!(binning.grid.total(), points.len() as u64);
        assert_eq!(binning.stats.binned, points.len() as u64);
        // edges are [0, 10]: every interior point lands in bin 0 on both axes
        assert_eq!(binning.grid.get(0, 0), Some(5));
    }

    #[test]
    fn assignment_uses_right_open_bins() {
        // edges [0, 2.5, 5, 7.5, 10]
        let binning = bin(&[(2.5, 2.6), (7.6, 0.1)], 5, UnderflowPolicy::Reject);
        assert_eq!(binning.grid.get(0, 1), Some(1), "2.5 is not strictly above edge 2.5");
        assert_eq!(binning.grid.get(3, 0), Some(1));
        assert_eq!(binning.grid.total(), 2);
    }

    #[test]
    fn minimum_corner_is_clamped_to_first_cell() {
        let binning = bin(&[(0.0, 0.0)], 2, UnderflowPolicy::Clamp);
        assert_eq!(binning.grid.get(0, 0), Some(1));
        assert_eq!(binning.grid.total(), 1);
        assert_eq!(binning.stats.underflow_clamped, 1);
    }

    #[test]
    fn minimum_corner_is_rejected_under_reject_policy() {
        let err = bin_points([(0.0, 0.0)], UNIT, UNIT, 2, UnderflowPolicy::Reject).unwrap_err();
        assert_eq!(
            err,
            BinningError::Underflow {
                axis: Axis::X,
                value: 0.0
            }
        );
    }

    #[test]
    fn underflow_on_second_axis_only_is_reported_for_that_axis() {
        let err = bin_points([(5.0, -3.0)], UNIT, UNIT, 2, UnderflowPolicy::Reject).unwrap_err();
        assert_eq!(
            err,
            BinningError::Underflow {
                axis: Axis::Y,
                value: -3.0
            }
        );
    }

    #[test]
    fn overflow_lands_in_last_bin() {
        let binning = bin(&[(15.0, 5.0)], 2, UnderflowPolicy::Reject);
        assert_eq!(binning.grid.get(1, 0), Some(1));
        assert_eq!(binning.stats.overflow, 1);
        assert_eq!(binning.grid.total(), 1);
    }

    #[test]
    fn value_equal_to_maximum_is_not_overflow() {
        // two edges below 10.0 of [0, 5, 10] -> bin 1, one short of the last
        let binning = bin(&[(10.0, 10.0)], 3, UnderflowPolicy::Reject);
        assert_eq!(binning.grid.get(1, 1), Some(1));
        assert_eq!(binning.stats.overflow, 0);
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let binning = bin(
            &[(f64::NAN, 1.0), (1.0, f64::INFINITY), (1.0, 1.0)],
            2,
            UnderflowPolicy::Reject,
        );
        assert_eq!(binning.grid.total(), 1);
        assert_eq!(binning.stats.skipped_non_finite, 2);
    }

    #[test]
    fn empty_input_yields_zero_grid() {
        let binning = bin(&[], 4, UnderflowPolicy::Clamp);
        assert_eq!(binning.grid.total(), 0);
        assert_eq!(binning.grid.max(), 0);
        assert_eq!(binning.stats, BinningStats::default());
    }

    #[test]
    fn binning_is_idempotent() {
        let points: Vec<(f64, f64)> = (0..200)
            .map(|k| {
                let k = f64::from(k);
                ((k * 0.37) % 12.0 - 1.0, (k * 0.73) % 11.0)
            })
            .collect();
        let first = bin(&points, 7, UnderflowPolicy::Clamp);
        let second = bin(&points, 7, UnderflowPolicy::Clamp);
        assert_eq!(first, second);
    }

    #[test]
    fn no_cell_exceeds_input_count() {
        let points = vec![(3.3, 3.3); 17];
        let binning = bin(&points, 3, UnderflowPolicy::Clamp);
        assert_eq!(binning.grid.max(), 17);
        assert!(binning.grid.rows().flatten().all(|&c| c <= 17));
    }

    #[test]
    fn rejects_zero_bins_and_bad_ranges() {
        assert_eq!(
            bin_points(std::iter::empty(), UNIT, UNIT, 0, UnderflowPolicy::Clamp).unwrap_err(),
            BinningError::InvalidBinCount
        );
        let inverted = AxisRange::new(10.0, 0.0);
        assert!(matches!(
            bin_points(std::iter::empty(), UNIT, inverted, 2, UnderflowPolicy::Clamp),
            Err(BinningError::InvalidRange { axis: Axis::Y, .. })
        ));
    }

    #[test]
    fn rejects_bin_count_above_limit() {
        assert_eq!(
            bin_points(
                std::iter::empty(),
                UNIT,
                UNIT,
                MAX_NUM_BINS + 1,
                UnderflowPolicy::Clamp
            )
            .unwrap_err(),
            BinningError::InvalidBinCount
        );
        assert_eq!(
            bin_points(std::iter::empty(), UNIT, UNIT, usize::MAX, UnderflowPolicy::Clamp)
                .unwrap_err(),
            BinningError::InvalidBinCount
        );
    }

    #[test]
    fn range_too_narrow_for_distinct_edges_is_rejected() {
        let narrow = AxisRange::new(1.0, 4.0f64.mul_add(f64::EPSILON, 1.0));
        assert!(narrow.is_valid());
        assert!(
            linspace(narrow, 50).values().windows(2).any(|w| w[0] >= w[1]),
            "expected repeated edges"
        );
        assert_eq!(
            bin_points(std::iter::empty(), narrow, UNIT, 50, UnderflowPolicy::Clamp).unwrap_err(),
            BinningError::InvalidRange {
                axis: Axis::X,
                min: narrow.min,
                max: narrow.max,
            }
        );
    }

    #[test]
    fn range_wider_than_f64_span_stays_finite() {
        let huge = AxisRange::new(-f64::MAX, f64::MAX);
        assert!(huge.span().is_infinite());

        let edges = linspace(huge, 3);
        assert_eq!(edges.values(), &[-f64::MAX, 0.0, f64::MAX]);

        let binning = bin_points([(0.0, 5.0)], huge, UNIT, 3, UnderflowPolicy::Reject).unwrap();
        assert!(binning.x_edges.values().iter().all(|e| e.is_finite()));
        assert_eq!(binning.grid.get(0, 0), Some(1));
        assert_eq!(binning.grid.total(), 1);
    }

    #[test]
    fn end_to_end_robbery_scenario() {
        let records = vec![
            IncidentRecord {
                category: Some("Robbery".to_string()),
                longitude: Some(-122.4),
                latitude: Some(37.75),
                ..IncidentRecord::default()
            },
            IncidentRecord {
                category: Some("Warrant".to_string()),
                longitude: Some(-122.4),
                latitude: Some(37.75),
                ..IncidentRecord::default()
            },
            IncidentRecord {
                category: Some("Robbery".to_string()),
                longitude: None,
                latitude: Some(37.75),
                ..IncidentRecord::default()
            },
        ];
        let allow = AllowList::new(["Robbery"]);

        let filtered = filter_incidents(&records, &allow);
        assert_eq!(filtered.records.len(), 1);
        assert!(std::ptr::eq(filtered.records[0], &records[0]));

        let ranges = RangeConfig {
            longitude: LON_RANGE,
            latitude: LAT_RANGE,
        };
        let binning =
            histogram_bins_by_lat_long(&filtered.records, &ranges, 10, UnderflowPolicy::Reject)
                .unwrap();
        assert_eq!(binning.grid.total(), 1);
        assert_eq!(binning.grid.num_bins(), 10);
        assert_eq!(binning.stats.underflow_clamped, 0);
    }
}
