#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line explorer for geolocated incident reports.
//!
//! Loads a delimited incident dataset, keeps the curated categories, and
//! bins incident coordinates into a longitude/latitude grid drawn as a
//! heatmap or 3D surface. Also lists and describes the categories present
//! in the data to help curate the allow-list.
//!
//! Running without a subcommand opens an interactive menu.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use commands::{DEFAULT_SCATTER_OUTPUT, GridArgs, GridPlot};
use crime_explore_analysis_models::UnderflowPolicy;
use crime_explore_render::Colormap;

#[derive(Parser)]
#[command(name = "crime_explore", about = "Explore incident reports on a lat/long grid")]
struct Cli {
    /// TOML configuration file (defaults to the embedded SF incidents config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Input CSV (or `.csv.gz`) path, overriding `file_path` from the config
    #[arg(long, global = true)]
    input: Option<PathBuf>,
    /// What to do with points at or below a range minimum: `clamp` into the
    /// first bin or `reject` the run
    #[arg(long, global = true, default_value = "clamp")]
    underflow: UnderflowPolicy,
    #[command(subcommand)]
    command: Option<Commands>,
}

// Options shared by the heatmap and surface views.
#[derive(Args)]
struct GridOptions {
    /// Bins per axis (defaults to `num_bins` from the config)
    #[arg(long)]
    bins: Option<usize>,
    /// Output image (`.png` or `.svg`; defaults to `heatmap.png` or
    /// `surface.png`)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Only include this category; repeat for several. Replaces the
    /// curated allow-list.
    #[arg(long = "category")]
    categories: Vec<String>,
    /// Colormap (`viridis`, `cool_warm`, `turbo`)
    #[arg(long)]
    colormap: Option<Colormap>,
}

impl GridOptions {
    fn into_grid_args(self, plot: GridPlot) -> GridArgs {
        GridArgs {
            plot,
            bins: self.bins,
            output: self
                .output
                .unwrap_or_else(|| PathBuf::from(plot.default_output())),
            categories: self.categories,
            colormap: self.colormap,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a 2D heatmap of incident counts per cell
    Heatmap(GridOptions),
    /// Draw a 3D surface of incident counts per cell
    Surface(GridOptions),
    /// Plot every filtered incident as a point
    Scatter {
        /// Output image (`.png` or `.svg`)
        #[arg(long, default_value = DEFAULT_SCATTER_OUTPUT)]
        output: PathBuf,
        /// Only include this category; repeat for several. Replaces the
        /// curated allow-list.
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// List every category with its incident count and curation class
    Categories {
        /// Also write a bar chart of the counts to this image
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the subcategories and descriptions recorded under one category
    Describe {
        /// Category name, exactly as it appears in the data
        category: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_explore_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = commands::resolve_config(cli.config.as_deref(), cli.input)?;

    let Some(command) = cli.command else {
        return interactive::run(&config, cli.underflow, &multi);
    };

    let records = commands::load(&config, &multi)?;

    match command {
        Commands::Scatter { output, categories } => {
            commands::scatter(&records, &config, &output, &categories)?;
        }
        Commands::Categories { output } => {
            commands::categories(&records, output.as_deref())?;
        }
        Commands::Describe { category } => commands::describe(&records, &category),
        Commands::Heatmap(options) => {
            let args = options.into_grid_args(GridPlot::Heatmap);
            commands::grid(&records, &config, cli.underflow, &args)?;
        }
        Commands::Surface(options) => {
            let args = options.into_grid_args(GridPlot::Surface);
            commands::grid(&records, &config, cli.underflow, &args)?;
        }
    }

    Ok(())
}
