mod client;
mod config;
mod export;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use client::InspireClient;
use export::ExportConfig;

#[derive(Parser, Debug)]
#[command(name = "inspire-seminars-to-ics", version)]
#[command(about = "Fetch seminars from INSPIRE and write them to an .ics file")]
struct Cli {
    /// Names of the seminar series to fetch
    series: Vec<String>,

    /// Fetch Oxford Dalitz seminars
    #[arg(long)]
    dalitz: bool,

    /// Fetch Oxford TPP seminars
    #[arg(long)]
    tpp: bool,

    /// Fetch a series by its alias from the [shortcuts] table in config.toml
    #[arg(long = "series-alias", value_name = "NAME")]
    aliases: Vec<String>,

    /// Name of the output file ("-" for stdout) [default: inspire.ics]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Get all seminars rather than just upcoming ones (at most 500 per series)
    #[arg(long)]
    all: bool,

    /// Suppress output
    #[arg(short, long)]
    quiet: bool,

    /// Log requests and config resolution
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Read settings from this file instead of ~/.config/inspire-seminars/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write strict RFC 5545 output (CRLF, folded and escaped lines)
    #[arg(long)]
    rfc5545: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let file_config = config::load_config(cli.config.as_deref())?;
    let export_config = ExportConfig::resolve(&cli, &file_config)?;
    log::debug!("{:?}", export_config);

    let client = InspireClient::new(export_config.api_url.clone())?;
    export::run(&export_config, &client)?;

    Ok(())
}
