//! Search-as-you-type over stdin lines.
//!
//! Each line is fed to a [`SearchSession`] as if it had been typed into a
//! search box. Results print once the debounced lookup for the latest line
//! completes; lines that arrive before then supersede it.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use meteo_core::{
    Config, Dashboard, LocationSearch, OpenMeteoForecast, OpenMeteoGeocoder, SearchSession,
};

use crate::{cli::View, render};

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Quit,
    /// 1-based index into the listed candidates.
    Pick(usize),
    Query(String),
}

impl Action {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.strip_prefix(':') {
            Some("q") => Self::Quit,
            Some(n) => match n.parse() {
                Ok(n) if n > 0 => Self::Pick(n),
                _ => Self::Query(line.to_string()),
            },
            None => Self::Query(line.to_string()),
        }
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let search = LocationSearch::new(OpenMeteoGeocoder::new(config)?);
    let mut session = SearchSession::new(Arc::new(search), config.debounce());
    let mut dashboard = Dashboard::new(
        OpenMeteoForecast::new(config)?,
        config.default_location.clone(),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type a place name. `:<n>` shows candidate n, `:q` quits.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match Action::parse(&line) {
                    Action::Quit => break,
                    Action::Query(query) => session.input(query),
                    Action::Pick(n) => {
                        let id = session.candidates().get(n - 1).map(|c| c.id);
                        let Some(chosen) = id.and_then(|id| session.select(id)) else {
                            println!("No candidate {n}.");
                            continue;
                        };

                        match dashboard.select(&chosen).await {
                            Ok(snapshot) => print!("{}", render::snapshot(snapshot, View::All)),
                            Err(err) => eprintln!(
                                "Could not load the forecast for {}: {err}",
                                chosen.display_name()
                            ),
                        }
                    }
                }
            }
            found = async { session.next_results().await.to_vec() }, if session.is_loading() => {
                if found.is_empty() {
                    println!("No locations found for '{}'.", session.query());
                } else {
                    print!("{}", render::candidates(&found));
                }
            }
        }
    }

    Ok(())
}
