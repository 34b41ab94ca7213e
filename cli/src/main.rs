//! # city-graph
//!
//! Interactive terminal front end for city-graph-core: load city files,
//! search them, and ask for nearest cities or shortest paths over a
//! randomly generated road network.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

mod config;
mod load;
mod menu;
mod state;
mod util;

use config::Settings;
use menu::Menu;
use state::Session;

/// Command-line interface for city-graph
#[derive(Parser)]
#[command(name = "city-graph")]
#[command(about = "Shortest paths and nearest cities over a random road network")]
#[command(long_about = "Loads city data files and answers nearest-city and shortest-path queries:
  city-graph                        # Start with no data, load from the menu
  city-graph cities.txt             # Load cities.txt before showing the menu
  city-graph cities.txt --seed 7    # Reproducible road network

File format: a city count on the first line, then for each city a
\"City, State\" line, a longitude line and a latitude line.")]
#[command(version)]
struct Cli {
    /// City data file to load before the menu starts
    file: Option<PathBuf>,

    #[command(flatten)]
    settings: Settings,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    let params = cli
        .settings
        .generation_params()
        .context("invalid generation settings")?;
    let mut session = Session::new(params, cli.settings.seed);

    println!("Welcome to city-graph!");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(&mut session, stdin.lock(), stdout.lock());
    if let Some(path) = &cli.file {
        menu.load_path(path).context("writing to terminal")?;
    }
    menu.run().context("terminal I/O failed")?;

    Ok(())
}
