//! Explore configuration loading.
//!
//! The default configuration (SF Police Department incident reports) is
//! baked into the binary at compile time via [`include_str!`]. A TOML file
//! with the same shape can override it at runtime.

use std::path::Path;

use crime_explore_source_models::ExploreConfig;

use crate::SourceError;

/// Default configuration embedded at compile time.
const DEFAULT_CONFIG_TOML: &str = include_str!("../config/sf_incidents.toml");

/// Parses an [`ExploreConfig`] from TOML text.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or describes an
/// invalid configuration.
pub fn parse_config_toml(toml_str: &str) -> Result<ExploreConfig, SourceError> {
    let config: ExploreConfig = toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        message: e.to_string(),
    })?;
    validate(&config)?;
    Ok(config)
}

/// Returns the embedded default configuration.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (a compile-time guarantee
/// since the file ships with the crate).
#[must_use]
pub fn default_config() -> ExploreConfig {
    parse_config_toml(DEFAULT_CONFIG_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse sf_incidents.toml: {e}"))
}

/// Loads a configuration file from disk.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read, or
/// [`SourceError::Config`] if it cannot be parsed.
pub fn load_config(path: &Path) -> Result<ExploreConfig, SourceError> {
    log::info!("Loading explore config from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    parse_config_toml(&text)
}

fn validate(config: &ExploreConfig) -> Result<(), SourceError> {
    if !config.delimiter.is_ascii() {
        return Err(SourceError::Config {
            message: format!("delimiter '{}' is not an ASCII character", config.delimiter),
        });
    }
    if config.num_bins == 0 {
        return Err(SourceError::Config {
            message: "num_bins must be at least 1".to_string(),
        });
    }
    for (name, range) in [
        ("longitude", config.ranges.longitude),
        ("latitude", config.ranges.latitude),
    ] {
        if !range.is_valid() {
            return Err(SourceError::Config {
                message: format!(
                    "{name} range [{}, {}] must be finite with min < max",
                    range.min, range.max
                ),
            });
        }
    }
    Ok(())
}
