//! Implementations behind each subcommand.
//!
//! Every command works on an already-loaded slice of records so the
//! interactive menu can load the dataset once and run several views over
//! it.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crime_explore_analysis::summary::{category_counts, describe_category};
use crime_explore_analysis::{Filtered, filter_incidents, histogram_bins_by_lat_long};
use crime_explore_analysis_models::{Binning, UnderflowPolicy};
use crime_explore_categories::{AllowList, CategoryClass, default_allow_list};
use crime_explore_cli_utils::{IndicatifProgress, MultiProgress};
use crime_explore_render::{
    CategoryBars, Colormap, DEFAULT_SIZE, Heatmap, Scatter, Surface, render,
};
use crime_explore_source::config::{default_config, load_config};
use crime_explore_source::{SourceError, load_dataset};
use crime_explore_source_models::{ExploreConfig, IncidentRecord};

/// Default path for the category bar chart.
pub const DEFAULT_CATEGORIES_OUTPUT: &str = "categories.png";

/// Default path for the scatter plot.
pub const DEFAULT_SCATTER_OUTPUT: &str = "scatter.png";

/// Which grid view to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPlot {
    Heatmap,
    Surface,
}

impl GridPlot {
    /// File written when no `--output` is given.
    #[must_use]
    pub const fn default_output(self) -> &'static str {
        match self {
            Self::Heatmap => "heatmap.png",
            Self::Surface => "surface.png",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Heatmap => "Incident density",
            Self::Surface => "Incident surface",
        }
    }
}

/// Options for [`grid`].
#[derive(Debug, Clone)]
pub struct GridArgs {
    pub plot: GridPlot,
    /// Bins per axis; falls back to the configured `num_bins`.
    pub bins: Option<usize>,
    pub output: PathBuf,
    /// Replaces the default allow-list when non-empty.
    pub categories: Vec<String>,
    /// Falls back to each plot's own default.
    pub colormap: Option<Colormap>,
}

/// Loads the configuration file (or the embedded default) and applies an
/// optional input path override.
///
/// # Errors
///
/// Returns [`SourceError`] if the configuration file cannot be read or is
/// invalid.
pub fn resolve_config(
    config_path: Option<&Path>,
    input: Option<PathBuf>,
) -> Result<ExploreConfig, SourceError> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => default_config(),
    };
    if let Some(input) = input {
        log::debug!("Overriding input path with {}", input.display());
        config.file_path = input;
    }
    Ok(config)
}

/// Loads the dataset behind a row-count spinner.
///
/// # Errors
///
/// Returns [`SourceError`] if the dataset cannot be read.
pub fn load(
    config: &ExploreConfig,
    multi: &MultiProgress,
) -> Result<Vec<IncidentRecord>, SourceError> {
    let progress = IndicatifProgress::rows_spinner(multi, "Loading incidents");
    load_dataset(config, &progress)
}

/// The allow-list in effect: the given categories if any, otherwise the
/// curated default.
#[must_use]
pub fn allow_list(categories: &[String]) -> Cow<'static, AllowList> {
    if categories.is_empty() {
        Cow::Borrowed(default_allow_list())
    } else {
        Cow::Owned(AllowList::new(categories.iter().cloned()))
    }
}

/// Short description of the category selection, for chart titles.
fn scope_label(categories: &[String]) -> String {
    match categories {
        [] => "curated categories".to_string(),
        [one] => one.clone(),
        many => format!("{} categories", many.len()),
    }
}

fn select<'a>(records: &'a [IncidentRecord], categories: &[String]) -> Filtered<'a> {
    let filtered = filter_incidents(records, &allow_list(categories));
    if filtered.records.is_empty() {
        log::warn!("No incidents left after filtering {}", scope_label(categories));
    }
    filtered
}

fn log_stats(binning: &Binning) {
    let stats = binning.stats;
    log::info!(
        "Binned {} points into a {n}x{n} grid (peak cell: {})",
        stats.binned,
        binning.grid.max(),
        n = binning.grid.num_bins(),
    );
    if stats.overflow > 0 {
        log::info!("{} points above a range maximum went to the last bin", stats.overflow);
    }
}

/// Filters, bins, and draws a heatmap or surface.
///
/// # Errors
///
/// Returns an error if binning is rejected or rendering fails.
pub fn grid(
    records: &[IncidentRecord],
    config: &ExploreConfig,
    policy: UnderflowPolicy,
    args: &GridArgs,
) -> Result<Binning, Box<dyn std::error::Error>> {
    let filtered = select(records, &args.categories);
    let bins = args.bins.unwrap_or(config.num_bins);
    let binning = histogram_bins_by_lat_long(&filtered.records, &config.ranges, bins, policy)?;
    log_stats(&binning);

    let title = format!(
        "{} of {} ({bins}x{bins} bins)",
        args.plot.label(),
        scope_label(&args.categories)
    );

    match args.plot {
        GridPlot::Heatmap => {
            let mut figure = Heatmap::new(&binning, title);
            if let Some(colormap) = args.colormap {
                figure = figure.with_colormap(colormap);
            }
            render(&figure, &args.output, DEFAULT_SIZE)?;
        }
        GridPlot::Surface => {
            let mut figure = Surface::new(&binning, title);
            if let Some(colormap) = args.colormap {
                figure = figure.with_colormap(colormap);
            }
            render(&figure, &args.output, DEFAULT_SIZE)?;
        }
    }

    Ok(binning)
}

/// Filters and draws every surviving incident as a point.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn scatter(
    records: &[IncidentRecord],
    config: &ExploreConfig,
    output: &Path,
    categories: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let filtered = select(records, categories);
    let points: Vec<(f64, f64)> = filtered
        .records
        .iter()
        .filter_map(|record| record.coordinates())
        .collect();

    let title = format!("Incidents: {}", scope_label(categories));
    render(&Scatter::new(&points, config.ranges, title), output, DEFAULT_SIZE)?;
    Ok(())
}

/// Prints every category with its row count and curation class, and
/// optionally writes a bar chart of the counts.
///
/// # Errors
///
/// Returns an error if the chart cannot be rendered.
pub fn categories(
    records: &[IncidentRecord],
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let counts = category_counts(records);
    let width = counts
        .iter()
        .map(|c| c.category.len())
        .max()
        .unwrap_or(0)
        .max("Category".len());

    println!("{:<width$}  {:>9}  Class", "Category", "Incidents");
    println!("{}", "-".repeat(width + 20));
    for count in &counts {
        println!("{:<width$}  {:>9}  {}", count.category, count.count, count.class);
    }
    println!();
    println!("{} categories", counts.len());

    let unclassified: Vec<&str> = counts
        .iter()
        .filter(|c| c.class == CategoryClass::Unclassified)
        .map(|c| c.category.as_str())
        .collect();
    if !unclassified.is_empty() {
        log::warn!(
            "{} categories are not on any curated list: {}",
            unclassified.len(),
            unclassified.join(", ")
        );
    }

    if let Some(path) = output {
        let title = format!("Incidents per category ({} rows)", records.len());
        render(&CategoryBars::new(&counts, title), path, DEFAULT_SIZE)?;
    }

    Ok(())
}

/// Prints the distinct subcategories and descriptions of one category.
pub fn describe(records: &[IncidentRecord], category: &str) {
    let description = describe_category(records, category);

    if description.count == 0 {
        println!("No incidents with category \"{category}\"");
        return;
    }

    println!(
        "{} ({}): {} incidents, {:.2}% of {} rows",
        description.category,
        description.class,
        description.count,
        description.share * 100.0,
        records.len()
    );

    println!();
    println!("Subcategories:");
    for subcategory in &description.subcategories {
        println!("  {subcategory}");
    }

    println!();
    println!("Descriptions:");
    for text in &description.descriptions {
        println!("  {text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, lon: f64, lat: f64) -> IncidentRecord {
        IncidentRecord {
            category: Some(category.to_string()),
            longitude: Some(lon),
            latitude: Some(lat),
            subcategory: None,
            description: None,
        }
    }

    #[test]
    fn empty_category_list_uses_curated_default() {
        let list = allow_list(&[]);
        assert!(matches!(list, Cow::Borrowed(_)));
        assert!(list.contains("Robbery"));
        assert!(!list.contains("Warrant"));
    }

    #[test]
    fn explicit_categories_replace_the_default() {
        let list = allow_list(&["Warrant".to_string()]);
        assert_eq!(list.len(), 1);
        assert!(list.contains("Warrant"));
        assert!(!list.contains("Robbery"));
    }

    #[test]
    fn scope_label_names_single_category() {
        assert_eq!(scope_label(&[]), "curated categories");
        assert_eq!(scope_label(&["Arson".to_string()]), "Arson");
        assert_eq!(
            scope_label(&["Arson".to_string(), "Assault".to_string()]),
            "2 categories"
        );
    }

    #[test]
    fn input_override_replaces_configured_path() {
        let config = resolve_config(None, Some(PathBuf::from("other.csv.gz"))).unwrap();
        assert_eq!(config.file_path, PathBuf::from("other.csv.gz"));
        assert_eq!(config.num_bins, default_config().num_bins);
    }

    #[test]
    fn grid_rejects_unsupported_output_after_binning() {
        let records = vec![record("Robbery", -122.45, 37.75)];
        let args = GridArgs {
            plot: GridPlot::Heatmap,
            bins: Some(4),
            output: PathBuf::from("grid.txt"),
            categories: Vec::new(),
            colormap: None,
        };
        let err = grid(&records, &default_config(), UnderflowPolicy::Clamp, &args).unwrap_err();
        assert!(err.to_string().contains("Unsupported output format"));
    }

    #[test]
    fn grid_surfaces_underflow_rejection() {
        let records = vec![record("Robbery", -130.0, 37.75)];
        let args = GridArgs {
            plot: GridPlot::Surface,
            bins: Some(4),
            output: PathBuf::from("surface.png"),
            categories: Vec::new(),
            colormap: None,
        };
        let err = grid(&records, &default_config(), UnderflowPolicy::Reject, &args).unwrap_err();
        assert_eq!(
            err.to_string(),
            "x (longitude) value -130 is at or below the first bin edge"
        );
    }
}
