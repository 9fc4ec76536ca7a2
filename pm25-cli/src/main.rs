//! pm25-cli - Command line tool for Bangkok park PM2.5 reports.

use clap::Parser;
use pm25_cmd::{OutputFormat, Settings};
use pm25_park::source::DEFAULT_SOURCE_PATH;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pm25-cli",
    version,
    about = "Bangkok park PM2.5 analysis toolkit"
)]
struct Cli {
    /// Path to the wide yearly/monthly PM2.5 CSV
    #[arg(short, long, global = true, default_value = DEFAULT_SOURCE_PATH)]
    data: PathBuf,

    /// Output format for views
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: pm25_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings {
        data: cli.data,
        format: cli.format,
    };
    log::debug!("Reading {} as {:?}", settings.data.display(), settings.format);
    pm25_cmd::run(cli.command, &settings)
}
