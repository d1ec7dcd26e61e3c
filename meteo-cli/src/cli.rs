use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::Select;
use std::path::PathBuf;

use meteo_core::{
    Config, Dashboard, LocationSearch, OpenMeteoForecast, OpenMeteoGeocoder, Place,
    SearchCandidate,
};

use crate::{browse, configure, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Log requests and search decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List locations matching a name.
    Search {
        /// Place name, e.g. "Sapporo" or "渋谷".
        query: String,
    },

    /// Show the forecast for a place.
    Show {
        /// Place name; the configured default place when absent.
        query: Option<String>,

        /// Latitude; skips the location search.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude; skips the location search.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        #[arg(long, value_enum, default_value_t = View::All)]
        view: View,
    },

    /// Search as you type, then pick a candidate to see its forecast.
    Browse,

    /// Interactively edit and save the configuration.
    Configure,
}

/// Which part of the dashboard to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Now,
    Hourly,
    Weekly,
    All,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let config = Config::load_from(&path)?;

        match self.command {
            Command::Search { query } => search(&config, &query).await,
            Command::Show {
                query,
                lat,
                lon,
                view,
            } => {
                let place = resolve_place(&config, query, lat.zip(lon)).await?;
                show(&config, place, view).await
            }
            Command::Browse => browse::run(&config).await,
            Command::Configure => configure::run(config, &path).await,
        }
    }
}

async fn search(config: &Config, query: &str) -> Result<()> {
    let search = LocationSearch::new(OpenMeteoGeocoder::new(config)?);
    let found = search.search(query).await;

    if found.is_empty() {
        println!("No locations found for '{query}'.");
    } else {
        print!("{}", render::candidates(&found));
    }
    Ok(())
}

async fn show(config: &Config, place: Place, view: View) -> Result<()> {
    let name = place.name.clone();
    let mut dashboard = Dashboard::new(OpenMeteoForecast::new(config)?, place);

    let snapshot = dashboard
        .reload()
        .await
        .with_context(|| format!("Could not load the forecast for {name}"))?;

    print!("{}", render::snapshot(snapshot, view));
    Ok(())
}

/// Coordinates win; then a searched name; then the configured default.
async fn resolve_place(
    config: &Config,
    query: Option<String>,
    coordinates: Option<(f64, f64)>,
) -> Result<Place> {
    if let Some((latitude, longitude)) = coordinates {
        let name = query.unwrap_or_else(|| format!("{latitude:.4}, {longitude:.4}"));
        return Ok(Place::new(name, latitude, longitude));
    }

    match query {
        Some(query) => {
            let chosen = pick_location(config, &query).await?;
            Ok(Place::from(&chosen))
        }
        None => Ok(config.default_location.clone()),
    }
}

/// Search for `query` and let the user choose when there is more than one hit.
pub async fn pick_location(config: &Config, query: &str) -> Result<SearchCandidate> {
    let search = LocationSearch::new(OpenMeteoGeocoder::new(config)?);
    let mut found = search.search(query).await;

    match found.len() {
        0 => bail!("No locations found for '{query}'"),
        1 => Ok(found.remove(0)),
        _ => {
            let labels: Vec<String> = found.iter().map(SearchCandidate::display_name).collect();
            let choice = Select::new("Choose a location:", labels)
                .raw_prompt()
                .context("Location selection cancelled")?;
            Ok(found.swap_remove(choice.index))
        }
    }
}
