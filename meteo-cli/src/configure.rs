//! Interactive configuration editor.

use anyhow::{Context, Result};
use inquire::{CustomType, Select, Text};
use std::path::Path;

use meteo_core::{Config, Place, config::WIND_SPEED_UNITS};

use crate::cli::pick_location;

const SERVICE_DEFAULT_UNIT: &str = "service default (km/h)";

pub async fn run(mut cfg: Config, path: &Path) -> Result<()> {
    cfg.language = Text::new("Geocoding language (e.g. ja, en):")
        .with_default(&cfg.language)
        .prompt()
        .context("Failed to read language")?;

    cfg.result_count = CustomType::<u8>::new("Candidates per lookup:")
        .with_default(cfg.result_count)
        .with_error_message("Please type a number between 1 and 255")
        .prompt()
        .context("Failed to read result count")?;

    cfg.debounce_ms = CustomType::<u64>::new("Search debounce (ms):")
        .with_default(cfg.debounce_ms)
        .with_error_message("Please type a whole number of milliseconds")
        .prompt()
        .context("Failed to read debounce window")?;

    let mut units = vec![SERVICE_DEFAULT_UNIT];
    units.extend_from_slice(WIND_SPEED_UNITS);
    let current = cfg
        .wind_speed_unit
        .as_deref()
        .and_then(|u| units.iter().position(|known| *known == u))
        .unwrap_or(0);
    let unit = Select::new("Wind speed unit:", units)
        .with_starting_cursor(current)
        .prompt()
        .context("Failed to read wind speed unit")?;
    cfg.wind_speed_unit = (unit != SERVICE_DEFAULT_UNIT).then(|| unit.to_string());

    let prompt = format!(
        "Default place (empty keeps {}):",
        cfg.default_location.name
    );
    let query = Text::new(&prompt)
        .prompt()
        .context("Failed to read default place")?;
    if !query.trim().is_empty() {
        let chosen = pick_location(&cfg, query.trim()).await?;
        cfg.default_location = Place::from(&chosen);
    }

    cfg.validate()?;
    cfg.save_to(path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}
