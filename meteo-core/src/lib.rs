//! Core library for the `meteo` weather dashboard.
//!
//! This crate defines:
//! - Location search against a geocoding service, with a debounced session
//! - Weather code classification
//! - Forecast fetching and chart-ready series
//! - Dashboard state and configuration
//!
//! It is used by `meteo-cli`, but can also be reused by other front-ends.

pub mod classify;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod geocoding;
pub mod model;
pub mod search;
pub mod series;
pub mod session;

#[cfg(test)]
mod testing;

pub use classify::{WeatherClassification, classify};
pub use config::Config;
pub use dashboard::{Dashboard, DashboardState, Snapshot};
pub use error::{ForecastError, GeocodeError};
pub use forecast::{Forecast, ForecastSource, OpenMeteoForecast};
pub use geocoding::{Geocoder, OpenMeteoGeocoder};
pub use model::{Place, SearchCandidate};
pub use search::LocationSearch;
pub use series::{DailyPoint, ForecastPoint, build_daily, build_hourly};
pub use session::SearchSession;
