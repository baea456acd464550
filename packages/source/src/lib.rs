#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident dataset loading.
//!
//! Reads a delimited file (optionally gzip-compressed) into
//! [`IncidentRecord`]s, addressing columns by the names configured in
//! [`ExploreConfig`]. The file is opened, read fully, and closed; nothing
//! is written back.

pub mod config;
pub mod parsing;
pub mod progress;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use crime_explore_source_models::{ColumnNames, ExploreConfig, IncidentRecord};

use crate::parsing::{non_empty, parse_coordinate};
use crate::progress::ProgressCallback;

/// How many rows to read between progress updates.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file open/read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV syntax error.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is not in the header row.
    #[error("Column '{column}' not found in header row")]
    MissingColumn {
        /// The configured column name that was not found.
        column: String,
    },

    /// Invalid configuration.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Resolved header positions for the configured columns.
struct ColumnIndices {
    category: usize,
    longitude: usize,
    latitude: usize,
    subcategory: Option<usize>,
    description: Option<usize>,
}

impl ColumnIndices {
    fn resolve(headers: &csv::StringRecord, columns: &ColumnNames) -> Result<Self, SourceError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| SourceError::MissingColumn {
                column: name.to_string(),
            })
        };
        let optional = |name: Option<&String>| {
            let name = name?;
            let index = find(name);
            if index.is_none() {
                log::debug!("Optional column '{name}' not present, skipping");
            }
            index
        };

        Ok(Self {
            category: require(&columns.category)?,
            longitude: require(&columns.longitude)?,
            latitude: require(&columns.latitude)?,
            subcategory: optional(columns.subcategory.as_ref()),
            description: optional(columns.description.as_ref()),
        })
    }
}

/// Reads incident records from any delimited-text reader.
///
/// The first row must be a header row containing the configured category,
/// longitude, and latitude columns. Empty cells become `None`; coordinates
/// that fail to parse are treated as missing.
///
/// # Errors
///
/// Returns [`SourceError::MissingColumn`] if a required column is absent,
/// or [`SourceError::Csv`] on malformed input.
pub fn read_incidents<R: Read>(
    reader: R,
    delimiter: u8,
    columns: &ColumnNames,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<IncidentRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let indices = ColumnIndices::resolve(reader.headers()?, columns)?;

    let mut records = Vec::new();
    let mut since_update: u64 = 0;

    for result in reader.records() {
        let row = result?;
        let text = |index: usize| non_empty(row.get(index)).map(str::to_owned);

        records.push(IncidentRecord {
            category: text(indices.category),
            longitude: parse_coordinate(row.get(indices.longitude)),
            latitude: parse_coordinate(row.get(indices.latitude)),
            subcategory: indices.subcategory.and_then(text),
            description: indices.description.and_then(text),
        });

        since_update += 1;
        if since_update == PROGRESS_INTERVAL {
            progress.inc(since_update);
            since_update = 0;
        }
    }
    progress.inc(since_update);

    Ok(records)
}

/// Loads the dataset described by `config` from disk.
///
/// Paths ending in `.gz` are decompressed on the fly.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or parsed, or if
/// the configured delimiter is not a single ASCII character.
pub fn load_dataset(
    config: &ExploreConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<IncidentRecord>, SourceError> {
    let path = config.file_path.as_path();
    let delimiter = delimiter_byte(config.delimiter)?;

    log::info!("Loading incidents from {}", path.display());
    progress.set_message(format!("Reading {}", path.display()));

    let file = File::open(path)?;
    if let Ok(metadata) = file.metadata() {
        log::debug!("{} is {} bytes", path.display(), metadata.len());
    }

    let reader = BufReader::new(file);
    let records = if is_gzip(path) {
        read_incidents(
            flate2::read::GzDecoder::new(reader),
            delimiter,
            &config.columns,
            progress,
        )?
    } else {
        read_incidents(reader, delimiter, &config.columns, progress)?
    };

    log::info!("Loaded {} rows from {}", records.len(), path.display());
    progress.finish(format!("Loaded {} rows", records.len()));

    Ok(records)
}

fn delimiter_byte(delimiter: char) -> Result<u8, SourceError> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| SourceError::Config {
            message: format!("delimiter '{delimiter}' is not an ASCII character"),
        })
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use crate::progress::null_progress;

    use super::*;

    const SAMPLE: &str = "\
Incident ID,Incident Category,Incident Subcategory,Incident Description,Latitude,Longitude
1,Robbery,Robbery - Street,\"Robbery, W/ Force\",37.75,-122.4
2,Warrant,Warrant,Warrant Arrest,37.76,-122.41
3,Robbery,Robbery - Other,Robbery,,-122.42
4,,,,37.7,-122.45
";

    #[test]
    fn reads_configured_columns_in_any_order() {
        let records = read_incidents(
            SAMPLE.as_bytes(),
            b',',
            &ColumnNames::default(),
            &null_progress(),
        )
        .unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].category.as_deref(), Some("Robbery"));
        assert_eq!(records[0].coordinates(), Some((-122.4, 37.75)));
        assert_eq!(records[0].description.as_deref(), Some("Robbery, W/ Force"));
        assert_eq!(records[0].subcategory.as_deref(), Some("Robbery - Street"));
        assert_eq!(records[2].latitude, None);
        assert_eq!(records[2].longitude, Some(-122.42));
        assert_eq!(records[3].category, None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let columns = ColumnNames {
            latitude: "Lat".to_string(),
            ..ColumnNames::default()
        };
        let err = read_incidents(SAMPLE.as_bytes(), b',', &columns, &null_progress()).unwrap_err();
        assert!(
            matches!(&err, SourceError::MissingColumn { column } if column == "Lat"),
            "{err}"
        );
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let data = "Incident Category\tLongitude\tLatitude\nArson\t-122.4\t37.7\n";
        let records =
            read_incidents(data.as_bytes(), b'\t', &ColumnNames::default(), &null_progress())
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category.as_deref(), Some("Arson"));
        assert_eq!(records[0].subcategory, None);
        assert_eq!(records[0].description, None);
    }

    #[test]
    fn load_dataset_reads_gzip_files() {
        let path = std::env::temp_dir().join(format!(
            "crime_explore_source_test_{}.csv.gz",
            std::process::id()
        ));
        {
            let file = File::create(&path).unwrap();
            let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            encoder.write_all(SAMPLE.as_bytes()).unwrap();
            encoder.finish().unwrap();
        }

        let config = ExploreConfig {
            file_path: path.clone(),
            ..ExploreConfig::default()
        };
        let result = load_dataset(&config, &null_progress());
        std::fs::remove_file(&path).ok();

        let records = result.unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn load_dataset_missing_file_is_io_error() {
        let config = ExploreConfig {
            file_path: "/nonexistent/crime_explore/incidents.csv".into(),
            ..ExploreConfig::default()
        };
        let err = load_dataset(&config, &null_progress()).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn delimiter_must_be_ascii() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert!(delimiter_byte('é').is_err());
    }
}
