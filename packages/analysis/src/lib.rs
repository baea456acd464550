#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident filtering, spatial binning, and category summaries.
//!
//! The pipeline is strictly linear: loaded records pass through
//! [`filter::filter_incidents`], and the survivors are counted into an
//! occupancy grid by [`binning::histogram_bins_by_lat_long`]. The
//! [`summary`] module supports curating the category allow-list.

pub mod binning;
pub mod filter;
pub mod summary;

pub use binning::{BinningError, MAX_NUM_BINS, bin_points, histogram_bins_by_lat_long, linspace};
pub use filter::{FilterReport, Filtered, filter_incidents};
