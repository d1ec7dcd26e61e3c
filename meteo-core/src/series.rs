//! Chart-ready point sequences built from forecast series.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    classify::{WeatherClassification, classify},
    forecast::{DailySeries, HourlySeries},
};

/// Number of hourly points shown from the reference instant on.
pub const HOURLY_WINDOW: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// "HH:MM" in the location's local time.
    pub label: String,
    pub time: DateTime<FixedOffset>,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    /// "M/D (Wkd)".
    pub label: String,
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub feels_like_max: Option<f64>,
    pub feels_like_min: Option<f64>,
    pub wind_speed_max: Option<f64>,
    pub condition: Option<WeatherClassification>,
}

fn sample<T: Copy>(column: &Option<Vec<Option<T>>>, idx: usize) -> Option<T> {
    column.as_ref()?.get(idx).copied().flatten()
}

/// The next [`HOURLY_WINDOW`] hours starting at the first sample at or after
/// `reference`, or at the start of the series when every sample is earlier.
/// Hours without a temperature are left out of the window.
pub fn build_hourly(series: &HourlySeries, reference: DateTime<Utc>) -> Vec<ForecastPoint> {
    let start = series
        .time
        .iter()
        .position(|time| *time >= reference)
        .unwrap_or(0);

    series
        .time
        .iter()
        .enumerate()
        .skip(start)
        .take(HOURLY_WINDOW)
        .filter_map(|(idx, time)| {
            let temperature = series.temperature.get(idx).copied().flatten()?;
            Some(ForecastPoint {
                label: time.format("%H:%M").to_string(),
                time: *time,
                temperature,
                feels_like: sample(&series.feels_like, idx),
                precipitation_probability: sample(&series.precipitation_probability, idx),
                wind_speed: sample(&series.wind_speed, idx),
            })
        })
        .collect()
}

/// One point per day, optional values kept absent when the source lacks them.
/// Days missing either temperature bound are skipped.
pub fn build_daily(series: &DailySeries) -> Vec<DailyPoint> {
    series
        .time
        .iter()
        .enumerate()
        .filter_map(|(idx, date)| {
            Some(DailyPoint {
                label: date.format("%-m/%-d (%a)").to_string(),
                date: *date,
                temperature_max: series.temperature_max.get(idx).copied().flatten()?,
                temperature_min: series.temperature_min.get(idx).copied().flatten()?,
                feels_like_max: sample(&series.feels_like_max, idx),
                feels_like_min: sample(&series.feels_like_min, idx),
                wind_speed_max: sample(&series.wind_speed_max, idx),
                condition: sample(&series.weather_code, idx).map(classify),
            })
        })
        .collect()
}
