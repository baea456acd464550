#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial binning types shared by the analysis and rendering crates.
//!
//! An [`OccupancyGrid`] counts points per (longitude-bin, latitude-bin) cell.
//! The [`BinEdges`] that produced it double as axis tick values when the
//! grid is rendered.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A closed coordinate domain `[min, max]` to bin over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Lower bound (first bin edge).
    pub min: f64,
    /// Upper bound (last bin edge).
    pub max: f64,
}

impl AxisRange {
    /// Creates a range from its bounds. No validation is performed here;
    /// see [`Self::is_valid`].
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if both bounds are finite and `min < max`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }

    /// Width of the range (`max - min`).
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Returns `true` if `value` lies in `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl From<[f64; 2]> for AxisRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

/// Which grid axis a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum Axis {
    /// First grid index (longitude).
    #[strum(serialize = "x (longitude)")]
    X,
    /// Second grid index (latitude).
    #[strum(serialize = "y (latitude)")]
    Y,
}

/// What to do with a point whose bin index computes to `-1`.
///
/// The assignment rule "count of edges strictly below the value, minus one"
/// yields `-1` for a value equal to (or below) the first edge.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UnderflowPolicy {
    /// Assign the point to bin 0 and count it in
    /// [`BinningStats::underflow_clamped`].
    #[default]
    Clamp,
    /// Abort binning with an error naming the offending axis and value.
    Reject,
}

/// Evenly spaced, strictly increasing bin edges over an [`AxisRange`].
///
/// Edge `k` is the exclusive lower bound of bin `k`. The last bin has no
/// upper bound and collects everything strictly above the last edge; a
/// value equal to the last edge lands one bin below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinEdges {
    values: Vec<f64>,
}

impl BinEdges {
    /// Wraps precomputed edge values. Callers guarantee they are strictly
    /// increasing.
    #[must_use]
    pub const fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Edge values, lowest first.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of edges (equal to the number of bins on this axis).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw bin index for `value`: the number of edges strictly less than
    /// `value`, minus one.
    ///
    /// Returns `-1` for values at or below the first edge and
    /// `len() - 1` for values above the last edge.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn raw_index(&self, value: f64) -> isize {
        self.values.partition_point(|edge| *edge < value) as isize - 1
    }

    /// Spacing between consecutive edges, or `None` with fewer than two
    /// edges.
    #[must_use]
    pub fn step(&self) -> Option<f64> {
        match self.values.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }
}

/// Dense `N x N` grid of per-cell counts.
///
/// Cell `(i, j)` holds the number of points in longitude bin `i` and
/// latitude bin `j`. Stored row-major by `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    num_bins: usize,
    cells: Vec<u64>,
}

impl OccupancyGrid {
    /// Creates a zeroed `num_bins x num_bins` grid, or `None` if the cell
    /// count overflows `usize`.
    #[must_use]
    pub fn try_zeros(num_bins: usize) -> Option<Self> {
        let len = num_bins.checked_mul(num_bins)?;
        Some(Self {
            num_bins,
            cells: vec![0; len],
        })
    }

    /// Grid resolution per axis.
    #[must_use]
    pub const fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Count in cell `(i, j)`, or `None` if either index is out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<u64> {
        if i >= self.num_bins || j >= self.num_bins {
            return None;
        }
        self.cells.get(i * self.num_bins + j).copied()
    }

    /// Adds one to cell `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn increment(&mut self, i: usize, j: usize) {
        assert!(
            i < self.num_bins && j < self.num_bins,
            "cell ({i}, {j}) outside {n}x{n} grid",
            n = self.num_bins
        );
        self.cells[i * self.num_bins + j] += 1;
    }

    /// Iterates over the rows of the grid. Row `i` holds every latitude bin
    /// for longitude bin `i`.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        // `chunks` rejects a zero chunk size; an empty grid has no rows anyway.
        self.cells.chunks(self.num_bins.max(1))
    }

    /// Sum of all cells.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    /// Largest cell count (0 for an empty grid).
    #[must_use]
    pub fn max(&self) -> u64 {
        self.cells.iter().copied().max().unwrap_or(0)
    }
}

/// Counters describing how points were assigned during binning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinningStats {
    /// Points that received a cell (equals [`OccupancyGrid::total`]).
    pub binned: u64,
    /// Points whose index on at least one axis was `-1` and was clamped to 0.
    pub underflow_clamped: u64,
    /// Points above the last edge on at least one axis (kept in the last bin).
    pub overflow: u64,
    /// Points with a NaN or infinite coordinate, never assigned a cell.
    pub skipped_non_finite: u64,
}

/// The result of binning a point set: grid, both edge sequences, and
/// assignment counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    /// Per-cell counts.
    pub grid: OccupancyGrid,
    /// Longitude edges (grid's first index).
    pub x_edges: BinEdges,
    /// Latitude edges (grid's second index).
    pub y_edges: BinEdges,
    /// Assignment counters.
    pub stats: BinningStats,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn raw_index_counts_edges_strictly_below() {
        let edges = BinEdges::from_values(vec![0.0, 5.0, 10.0]);
        assert_eq!(edges.raw_index(-1.0), -1);
        assert_eq!(edges.raw_index(0.0), -1);
        assert_eq!(edges.raw_index(0.1), 0);
        assert_eq!(edges.raw_index(5.0), 0);
        assert_eq!(edges.raw_index(5.1), 1);
        assert_eq!(edges.raw_index(10.0), 1);
        assert_eq!(edges.raw_index(10.1), 2);
        assert_eq!(edges.raw_index(1e9), 2);
    }

    #[test]
    fn grid_get_is_bounds_checked() {
        let mut grid = OccupancyGrid::try_zeros(3).unwrap();
        grid.increment(2, 1);
        grid.increment(2, 1);
        assert_eq!(grid.get(2, 1), Some(2));
        assert_eq!(grid.get(1, 2), Some(0));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.total(), 2);
        assert_eq!(grid.max(), 2);
    }

    #[test]
    #[should_panic(expected = "outside 2x2 grid")]
    fn grid_increment_out_of_bounds_panics() {
        let mut grid = OccupancyGrid::try_zeros(2).unwrap();
        grid.increment(2, 0);
    }

    #[test]
    fn grid_rows_are_longitude_major() {
        let mut grid = OccupancyGrid::try_zeros(2).unwrap();
        grid.increment(1, 0);
        let rows: Vec<&[u64]> = grid.rows().collect();
        assert_eq!(rows, vec![&[0, 0][..], &[1, 0][..]]);
    }

    #[test]
    fn oversized_grid_is_refused() {
        assert!(OccupancyGrid::try_zeros(usize::MAX).is_none());
    }

    #[test]
    fn empty_grid_has_no_rows() {
        let grid = OccupancyGrid::try_zeros(0).unwrap();
        assert_eq!(grid.rows().count(), 0);
        assert_eq!(grid.max(), 0);
    }

    #[test]
    fn axis_range_validity() {
        assert!(AxisRange::new(0.0, 10.0).is_valid());
        assert!(!AxisRange::new(10.0, 0.0).is_valid());
        assert!(!AxisRange::new(1.0, 1.0).is_valid());
        assert!(!AxisRange::new(f64::NAN, 1.0).is_valid());
        assert!(!AxisRange::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn underflow_policy_parses_from_cli_text() {
        assert_eq!(
            UnderflowPolicy::from_str("clamp").unwrap(),
            UnderflowPolicy::Clamp
        );
        assert_eq!(
            UnderflowPolicy::from_str("reject").unwrap(),
            UnderflowPolicy::Reject
        );
        assert!(UnderflowPolicy::from_str("wrap").is_err());
        assert_eq!(UnderflowPolicy::default(), UnderflowPolicy::Clamp);
    }
}
