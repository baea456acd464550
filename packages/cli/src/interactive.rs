//! Interactive menu for exploring a dataset.
//!
//! Loads the dataset once, then repeatedly asks which view to produce
//! until the user quits. Prompts default to the configured values, so
//! pressing enter through every question reproduces the flag defaults.

use std::path::PathBuf;

use crime_explore_analysis::summary::category_counts;
use crime_explore_analysis_models::UnderflowPolicy;
use crime_explore_cli_utils::MultiProgress;
use crime_explore_render::Colormap;
use crime_explore_source_models::{ExploreConfig, IncidentRecord};
use dialoguer::{Confirm, Input, Select};

use crate::commands::{self, DEFAULT_CATEGORIES_OUTPUT, DEFAULT_SCATTER_OUTPUT, GridArgs, GridPlot};

/// Menu entries.
enum Action {
    Heatmap,
    Surface,
    Scatter,
    Categories,
    Describe,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Heatmap,
        Self::Surface,
        Self::Scatter,
        Self::Categories,
        Self::Describe,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Heatmap => "Heatmap of incident counts",
            Self::Surface => "3D surface of incident counts",
            Self::Scatter => "Scatter plot of incidents",
            Self::Categories => "List categories",
            Self::Describe => "Describe a category",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded, user input fails, or a
/// chosen view cannot be produced.
pub fn run(
    config: &ExploreConfig,
    policy: UnderflowPolicy,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Crime Explore");
    println!();

    let records = commands::load(config, multi)?;
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let result = match Action::ALL[idx] {
            Action::Heatmap => prompt_grid(GridPlot::Heatmap, config)
                .and_then(|args| commands::grid(&records, config, policy, &args).map(|_| ())),
            Action::Surface => prompt_grid(GridPlot::Surface, config)
                .and_then(|args| commands::grid(&records, config, policy, &args).map(|_| ())),
            Action::Scatter => prompt_scatter(&records, config),
            Action::Categories => prompt_categories(&records),
            Action::Describe => prompt_describe(&records),
            Action::Quit => return Ok(()),
        };

        // A failed view should not end the session.
        if let Err(e) = result {
            log::error!("{e}");
        }
        println!();
    }
}

fn prompt_grid(
    plot: GridPlot,
    config: &ExploreConfig,
) -> Result<GridArgs, Box<dyn std::error::Error>> {
    let bins: usize = Input::new()
        .with_prompt("Bins per axis")
        .default(config.num_bins)
        .interact_text()?;

    let output = prompt_output(plot.default_output())?;
    let categories = prompt_categories_filter()?;

    let colormaps = [Colormap::Viridis, Colormap::CoolWarm, Colormap::Turbo];
    let default_colormap = match plot {
        GridPlot::Heatmap => 0,
        GridPlot::Surface => 1,
    };
    let names: Vec<String> = colormaps.iter().map(ToString::to_string).collect();
    let colormap_idx = Select::new()
        .with_prompt("Colormap")
        .items(&names)
        .default(default_colormap)
        .interact()?;

    Ok(GridArgs {
        plot,
        bins: Some(bins),
        output,
        categories,
        colormap: Some(colormaps[colormap_idx]),
    })
}

fn prompt_scatter(
    records: &[IncidentRecord],
    config: &ExploreConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = prompt_output(DEFAULT_SCATTER_OUTPUT)?;
    let categories = prompt_categories_filter()?;
    commands::scatter(records, config, &output, &categories)
}

fn prompt_categories(records: &[IncidentRecord]) -> Result<(), Box<dyn std::error::Error>> {
    let chart = Confirm::new()
        .with_prompt("Also write a bar chart?")
        .default(false)
        .interact()?;

    let output = if chart {
        Some(prompt_output(DEFAULT_CATEGORIES_OUTPUT)?)
    } else {
        None
    };

    commands::categories(records, output.as_deref())
}

fn prompt_describe(records: &[IncidentRecord]) -> Result<(), Box<dyn std::error::Error>> {
    let counts = category_counts(records);
    if counts.is_empty() {
        println!("The dataset has no categories");
        return Ok(());
    }

    let names: Vec<&str> = counts.iter().map(|c| c.category.as_str()).collect();
    let idx = Select::new()
        .with_prompt("Category")
        .items(&names)
        .default(0)
        .max_length(15)
        .interact()?;

    commands::describe(records, names[idx]);
    Ok(())
}

fn prompt_output(default: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path: String = Input::new()
        .with_prompt("Output image (.png or .svg)")
        .default(default.to_string())
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}

fn prompt_categories_filter() -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let categories: String = Input::new()
        .with_prompt("Categories to include (comma-separated, leave empty for the curated list)")
        .allow_empty(true)
        .interact_text()?;

    Ok(parse_category_list(&categories))
}

/// Splits a comma-separated category list, dropping blank entries.
fn parse_category_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
