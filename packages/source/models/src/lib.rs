#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record and dataset configuration types.
//!
//! The row source reads a delimited file into [`IncidentRecord`]s according
//! to an [`ExploreConfig`]. Coordinates are optional: rows without a
//! longitude or latitude are kept at load time and trimmed by the filter
//! stage.

use std::path::PathBuf;

use crime_explore_analysis_models::AxisRange;
use serde::{Deserialize, Serialize};

/// Default grid resolution per axis.
pub const DEFAULT_NUM_BINS: usize = 50;

/// Longitude domain covering San Francisco.
pub const LON_RANGE: AxisRange = AxisRange::new(-122.511_294_926_245_34, -122.363_742_766_952_95);

/// Latitude domain covering San Francisco.
pub const LAT_RANGE: AxisRange = AxisRange::new(37.707_988_259_184_67, 37.829_990_754_688_64);

/// A single row of the incident dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Incident category (e.g. `"Robbery"`). `None` when the cell is empty.
    pub category: Option<String>,
    /// Longitude (WGS84). `None` when the cell is empty or unparseable.
    pub longitude: Option<f64>,
    /// Latitude (WGS84). `None` when the cell is empty or unparseable.
    pub latitude: Option<f64>,
    /// Finer-grained category, if the dataset has one.
    pub subcategory: Option<String>,
    /// Free-text incident description, if the dataset has one.
    pub description: Option<String>,
}

impl IncidentRecord {
    /// Returns `(longitude, latitude)` when both coordinates are present.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some((lon, lat)),
            _ => None,
        }
    }
}

/// Column names to read from the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    /// Category column (required).
    pub category: String,
    /// Longitude column (required).
    pub longitude: String,
    /// Latitude column (required).
    pub latitude: String,
    /// Subcategory column. Read when present in the file.
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Description column. Read when present in the file.
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            category: "Incident Category".to_string(),
            longitude: "Longitude".to_string(),
            latitude: "Latitude".to_string(),
            subcategory: Some("Incident Subcategory".to_string()),
            description: Some("Incident Description".to_string()),
        }
    }
}

/// Coordinate domains to bin over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    /// Longitude range.
    pub longitude: AxisRange,
    /// Latitude range.
    pub latitude: AxisRange,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            longitude: LON_RANGE,
            latitude: LAT_RANGE,
        }
    }
}

/// Everything needed to load, filter, and bin one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreConfig {
    /// Path to the delimited input file. A `.gz` suffix means gzip.
    pub file_path: PathBuf,
    /// Field delimiter (single ASCII character).
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Grid resolution per axis.
    #[serde(default = "default_num_bins")]
    pub num_bins: usize,
    /// Input column names.
    #[serde(default)]
    pub columns: ColumnNames,
    /// Binning domains.
    #[serde(default)]
    pub ranges: RangeConfig,
}

const fn default_delimiter() -> char {
    ','
}

const fn default_num_bins() -> usize {
    DEFAULT_NUM_BINS
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("./data/Police_Department_Incident_Reports__2018_to_Present.csv"),
            delimiter: default_delimiter(),
            num_bins: DEFAULT_NUM_BINS,
            columns: ColumnNames::default(),
            ranges: RangeConfig::default(),
        }
    }
}
