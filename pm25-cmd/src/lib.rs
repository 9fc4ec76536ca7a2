//! Command implementations for the PM2.5 CLI.
//!
//! Every subcommand loads the source table, reshapes it, applies the
//! location/year/month filters and prints one view as a plain-text table
//! or as JSON.

use clap::{Args, Subcommand, ValueEnum};
use log::info;
use pm25_data::aggregate::Dimension;
use pm25_data::filter::{filter, FilterCriteria, Selection};
use pm25_data::forecast::DEFAULT_HORIZON;
use pm25_park::month::Month;
use pm25_park::observation::{Metric, Observation};
use std::io::Write;
use std::path::PathBuf;

pub mod export;
pub mod load;
pub mod render;
pub mod views;

/// How views are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data: PathBuf,
    pub format: OutputFormat,
}

/// Location, year and month filters. Omitted flags match everything.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Park name exactly as in the dataset, e.g. "สวนลุมพินี เขตปทุมวัน"
    #[arg(short, long)]
    pub location: Option<String>,

    /// Gregorian year, e.g. 2023
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Month as code (jan), English name, Thai name or number
    #[arg(short, long)]
    pub month: Option<Month>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            location: Selection::from(self.location.clone()),
            year: Selection::from(self.year),
            month: Selection::from(self.month),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List the parks, years and months available for filtering
    Options,

    /// Headline metrics: mean PM2.5, highest reading, exceeding days, parks
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Mean PM2.5 per park, or the monthly trend when one park is selected
    Average {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Monthly mean PM2.5 for each year
    Trend {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Side-by-side statistics for every park
    Compare {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Box-plot statistics grouped by park, month or year
    Distribution {
        #[command(flatten)]
        filter: FilterArgs,

        /// Grouping dimension: location, month or year
        #[arg(long, default_value = "location")]
        by: Dimension,

        /// Reading to summarise: lowest, highest, average or exceeding_days
        #[arg(long, default_value = "average")]
        metric: Metric,
    },

    /// Total days above the standard per month
    Exceedance {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Risk level and coordinates of every park
    Map {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Detailed table of the filtered observations
    Table {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Write the filtered observations to a CSV report
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output path (defaults to PM25_Report_<timestamp>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fit trend models to the yearly mean and project future years
    Forecast {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of years to project
        #[arg(long, default_value_t = DEFAULT_HORIZON)]
        horizon: usize,
    },
}

impl Command {
    fn filter_args(&self) -> Option<&FilterArgs> {
        match self {
            Command::Options => None,
            Command::Summary { filter }
            | Command::Average { filter }
            | Command::Trend { filter }
            | Command::Compare { filter }
            | Command::Distribution { filter, .. }
            | Command::Exceedance { filter }
            | Command::Map { filter }
            | Command::Table { filter, .. }
            | Command::Export { filter, .. }
            | Command::Forecast { filter, .. } => Some(filter),
        }
    }
}

pub fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    let observations = load::load_observations(&settings.data)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&command, &observations, settings.format, &mut out)
}

/// Run `command` against already loaded observations, writing to `out`.
pub fn execute<W: Write>(
    command: &Command,
    observations: &[Observation],
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let Some(filter_args) = command.filter_args() else {
        return views::options(observations, format, out);
    };
    let criteria = filter_args.criteria();
    let filtered = filter(observations, &criteria);
    info!(
        "{} of {} observations match the filters",
        filtered.len(),
        observations.len()
    );
    if filtered.is_empty() {
        writeln!(out, "{}", views::NO_DATA_NOTICE)?;
        return Ok(());
    }

    match command {
        Command::Options => views::options(observations, format, out),
        Command::Summary { .. } => views::summary(&filtered, format, out),
        Command::Average { .. } => views::average(&filtered, &criteria, format, out),
        Command::Trend { .. } => views::trend(&filtered, format, out),
        Command::Compare { .. } => views::compare(&filtered, format, out),
        Command::Distribution { by, metric, .. } => {
            views::distribution(&filtered, *by, *metric, format, out)
        }
        Command::Exceedance { .. } => views::exceedance(&filtered, format, out),
        Command::Map { .. } => views::map(&filtered, format, out),
        Command::Table { limit, .. } => views::table(&filtered, *limit, format, out),
        Command::Export { output, .. } => {
            let path = export::write_report(&filtered, output.as_deref())?;
            writeln!(out, "Wrote {} rows to {}", filtered.len(), path.display())?;
            Ok(())
        }
        Command::Forecast { horizon, .. } => views::forecast(&filtered, *horizon, format, out),
    }
}
