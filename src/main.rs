use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use warfleet::config_loader::{self, CliOverrides};
use warfleet::orchestrator::generate_fleet;

/// Topology generator for simulated Lightning Network wargames
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the fleet configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output root for the battlefields, armadas and armies directories
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Seed for every network, overriding the configuration file
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting warfleet");
    info!("Configuration file: {:?}", args.config);
    info!("Output directory: {:?}", args.output);

    let mut config = config_loader::load_config(&args.config)?;
    config_loader::apply_overrides(&mut config, &CliOverrides { seed: args.seed })?;

    let summaries = generate_fleet(&config, &args.output)?;
    for summary in &summaries {
        info!(
            "{}: wrote {} files (seed {})",
            summary.name,
            summary.files.len(),
            summary.seed
        );
    }

    info!("Fleet generation completed successfully");
    Ok(())
}
