//! Dashboard state: the selected place and the last forecast snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    classify::{WeatherClassification, classify},
    error::ForecastError,
    forecast::{CurrentConditions, Forecast, ForecastSource, Units},
    model::{Place, SearchCandidate},
    series::{DailyPoint, ForecastPoint, build_daily, build_hourly},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub conditions: CurrentConditions,
    pub classification: WeatherClassification,
}

/// Everything a front-end needs to render one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub place: Place,
    pub timezone: String,
    pub current: CurrentView,
    pub hourly: Vec<ForecastPoint>,
    pub daily: Vec<DailyPoint>,
    pub units: Units,
}

impl Snapshot {
    /// Shape a forecast for display, windowing the hourly series at `now`.
    pub fn build(place: Place, forecast: Forecast, now: DateTime<Utc>) -> Self {
        let hourly = build_hourly(&forecast.hourly, now);
        let daily = build_daily(&forecast.daily);
        let classification = classify(forecast.current.weather_code);

        Self {
            place,
            timezone: forecast.timezone,
            current: CurrentView {
                conditions: forecast.current,
                classification,
            },
            hourly,
            daily,
            units: forecast.units,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashboardState<'a> {
    /// No load has been attempted yet.
    Loading,
    Ready(&'a Snapshot),
    /// The first load failed; there is nothing to show.
    Unavailable,
}

#[derive(Debug)]
pub struct Dashboard<F> {
    source: F,
    place: Place,
    snapshot: Option<Snapshot>,
    attempted: bool,
}

impl<F: ForecastSource> Dashboard<F> {
    pub fn new(source: F, place: Place) -> Self {
        Self {
            source,
            place,
            snapshot: None,
            attempted: false,
        }
    }

    /// The place the current snapshot belongs to (or the initial one).
    pub fn place(&self) -> &Place {
        &self.place
    }

    pub fn state(&self) -> DashboardState<'_> {
        match (&self.snapshot, self.attempted) {
            (Some(snapshot), _) => DashboardState::Ready(snapshot),
            (None, false) => DashboardState::Loading,
            (None, true) => DashboardState::Unavailable,
        }
    }

    /// Fetch and shape the forecast for `place`.
    ///
    /// On failure the previous snapshot, if any, stays in place and the
    /// error is returned for the front-end to report.
    pub async fn load(&mut self, place: Place) -> Result<&Snapshot, ForecastError> {
        let result = self.source.fetch(place.latitude, place.longitude).await;
        self.attempted = true;

        match result {
            Ok(forecast) => {
                debug!(place = %place.name, "forecast loaded");
                let snapshot = Snapshot::build(place.clone(), forecast, Utc::now());
                self.place = place;
                Ok(self.snapshot.insert(snapshot))
            }
            Err(err) => {
                warn!(place = %place.name, error = %err, "failed to load forecast");
                Err(err)
            }
        }
    }

    /// Load the initial or current place again.
    pub async fn reload(&mut self) -> Result<&Snapshot, ForecastError> {
        self.load(self.place.clone()).await
    }

    pub async fn select(
        &mut self,
        candidate: &SearchCandidate,
    ) -> Result<&Snapshot, ForecastError> {
        self.load(Place::from(candidate)).await
    }
}
