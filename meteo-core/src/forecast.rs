//! Forecast endpoint client and the validated forecast model.
//!
//! The wire structs below mirror the Open-Meteo response. They are converted
//! into [`Forecast`] at the boundary: timestamps are parsed with the location's
//! UTC offset, required arrays must be parallel to `time`, and optional arrays
//! that are missing or inconsistent become `None`.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Debug};
use tracing::{debug, instrument, warn};

use crate::{
    config::Config,
    error::{ForecastError, truncate_body},
};

const CURRENT_VARIABLES: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
weather_code,wind_speed_10m,wind_direction_10m,is_day";

const HOURLY_VARIABLES: &str =
    "temperature_2m,apparent_temperature,precipitation_probability,wind_speed_10m";

const DAILY_VARIABLES: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
apparent_temperature_max,apparent_temperature_min,wind_speed_10m_max";

/// One fetch of current, hourly and daily data for a coordinate.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Forecast, ForecastError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub time: DateTime<FixedOffset>,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub weather_code: i32,
    pub wind_speed: Option<f64>,
    /// Degrees, 0 = north.
    pub wind_direction: Option<f64>,
    pub is_day: bool,
}

/// Parallel hourly arrays. `None` means the service did not deliver that
/// variable; a `None` sample means the value is missing at that hour.
/// Temperature is always delivered but may still have `null` samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlySeries {
    pub time: Vec<DateTime<FixedOffset>>,
    pub temperature: Vec<Option<f64>>,
    pub feels_like: Option<Vec<Option<f64>>>,
    pub precipitation_probability: Option<Vec<Option<f64>>>,
    pub wind_speed: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySeries {
    pub time: Vec<NaiveDate>,
    pub weather_code: Option<Vec<Option<i32>>>,
    pub temperature_max: Vec<Option<f64>>,
    pub temperature_min: Vec<Option<f64>>,
    pub feels_like_max: Option<Vec<Option<f64>>>,
    pub feels_like_min: Option<Vec<Option<f64>>>,
    pub wind_speed_max: Option<Vec<Option<f64>>>,
}

/// Display units as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Units {
    pub temperature: String,
    pub wind_speed: String,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            temperature: "°C".to_string(),
            wind_speed: "km/h".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub utc_offset_seconds: i32,
    pub current: CurrentConditions,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
    pub units: Units,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    utc_offset_seconds: i32,
    current: Option<ApiCurrent>,
    hourly: Option<ApiHourly>,
    daily: Option<ApiDaily>,
    #[serde(default)]
    current_units: HashMap<String, String>,
    #[serde(default)]
    hourly_units: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    time: String,
    temperature_2m: f64,
    weather_code: i32,
    relative_humidity_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    wind_speed_10m: Option<f64>,
    wind_direction_10m: Option<f64>,
    is_day: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct ApiHourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    apparent_temperature: Option<Vec<Option<f64>>>,
    precipitation_probability: Option<Vec<Option<f64>>>,
    wind_speed_10m: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct ApiDaily {
    time: Vec<String>,
    weather_code: Option<Vec<Option<i32>>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    apparent_temperature_max: Option<Vec<Option<f64>>>,
    apparent_temperature_min: Option<Vec<Option<f64>>>,
    wind_speed_10m_max: Option<Vec<Option<f64>>>,
}

impl ApiResponse {
    fn into_forecast(self) -> Result<Forecast, ForecastError> {
        let offset = FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            ForecastError::malformed(format!(
                "utc_offset_seconds out of range: {}",
                self.utc_offset_seconds
            ))
        })?;

        let current = self
            .current
            .ok_or_else(|| ForecastError::malformed("response has no current block"))?;
        let hourly = self
            .hourly
            .ok_or_else(|| ForecastError::malformed("response has no hourly block"))?;
        let daily = self
            .daily
            .ok_or_else(|| ForecastError::malformed("response has no daily block"))?;

        let units = Units::from_maps(&self.current_units, &self.hourly_units);

        Ok(Forecast {
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone,
            utc_offset_seconds: self.utc_offset_seconds,
            current: current.into_conditions(offset)?,
            hourly: hourly.into_series(offset)?,
            daily: daily.into_series()?,
            units,
        })
    }
}

impl ApiCurrent {
    fn into_conditions(self, offset: FixedOffset) -> Result<CurrentConditions, ForecastError> {
        Ok(CurrentConditions {
            time: parse_local_time(&self.time, offset)?,
            temperature: self.temperature_2m,
            feels_like: self.apparent_temperature,
            humidity: self.relative_humidity_2m,
            weather_code: self.weather_code,
            wind_speed: self.wind_speed_10m,
            wind_direction: self.wind_direction_10m,
            is_day: self.is_day.is_none_or(|flag| flag != 0),
        })
    }
}

impl ApiHourly {
    fn into_series(self, offset: FixedOffset) -> Result<HourlySeries, ForecastError> {
        let len = self.time.len();
        let time = self
            .time
            .iter()
            .map(|t| parse_local_time(t, offset))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HourlySeries {
            time,
            temperature: required("hourly.temperature_2m", self.temperature_2m, len)?,
            feels_like: optional("hourly.apparent_temperature", self.apparent_temperature, len),
            precipitation_probability: optional(
                "hourly.precipitation_probability",
                self.precipitation_probability,
                len,
            ),
            wind_speed: optional("hourly.wind_speed_10m", self.wind_speed_10m, len),
        })
    }
}

impl ApiDaily {
    fn into_series(self) -> Result<DailySeries, ForecastError> {
        let len = self.time.len();
        let time = self
            .time
            .iter()
            .map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|e| ForecastError::malformed(format!("invalid date '{d}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DailySeries {
            time,
            weather_code: optional("daily.weather_code", self.weather_code, len),
            temperature_max: required("daily.temperature_2m_max", self.temperature_2m_max, len)?,
            temperature_min: required("daily.temperature_2m_min", self.temperature_2m_min, len)?,
            feels_like_max: optional(
                "daily.apparent_temperature_max",
                self.apparent_temperature_max,
                len,
            ),
            feels_like_min: optional(
                "daily.apparent_temperature_min",
                self.apparent_temperature_min,
                len,
            ),
            wind_speed_max: optional("daily.wind_speed_10m_max", self.wind_speed_10m_max, len),
        })
    }
}

impl Units {
    fn from_maps(current: &HashMap<String, String>, hourly: &HashMap<String, String>) -> Self {
        let pick = |key: &str, fallback: String| {
            current
                .get(key)
                .or_else(|| hourly.get(key))
                .cloned()
                .unwrap_or(fallback)
        };
        let defaults = Self::default();

        Self {
            temperature: pick("temperature_2m", defaults.temperature),
            wind_speed: pick("wind_speed_10m", defaults.wind_speed),
        }
    }
}

/// Open-Meteo local timestamps carry no offset; attach the response's.
fn parse_local_time(s: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>, ForecastError> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| ForecastError::malformed(format!("invalid timestamp '{s}': {e}")))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ForecastError::malformed(format!("ambiguous timestamp '{s}'")))
}

fn required<T>(name: &str, values: Vec<T>, len: usize) -> Result<Vec<T>, ForecastError> {
    if values.len() != len {
        return Err(ForecastError::malformed(format!(
            "{name} has {} values, expected {len}",
            values.len()
        )));
    }
    Ok(values)
}

fn optional<T>(name: &str, values: Option<Vec<Option<T>>>, len: usize) -> Option<Vec<Option<T>>> {
    match values {
        Some(v) if v.len() != len => {
            warn!(series = name, got = v.len(), expected = len, "dropping inconsistent series");
            None
        }
        other => other,
    }
}

/// Open-Meteo forecast API client.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    url: String,
    wind_speed_unit: Option<String>,
}

impl OpenMeteoForecast {
    pub fn new(config: &Config) -> Result<Self, ForecastError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            url: config.forecast_url.clone(),
            wind_speed_unit: config.wind_speed_unit.clone(),
        })
    }

    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ForecastError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::InvalidCoordinates { latitude, longitude });
        }
        Ok(())
    }

    fn query(&self, latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_VARIABLES.to_string()),
            ("hourly", HOURLY_VARIABLES.to_string()),
            ("daily", DAILY_VARIABLES.to_string()),
            ("timezone", "auto".to_string()),
        ];

        if let Some(unit) = &self.wind_speed_unit {
            query.push(("wind_speed_unit", unit.clone()));
        }

        query
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoForecast {
    #[instrument(skip(self))]
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Forecast, ForecastError> {
        Self::validate_coordinates(latitude, longitude)?;

        let res = self
            .http
            .get(&self.url)
            .query(&self.query(latitude, longitude))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ForecastError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: ApiResponse = serde_json::from_str(&body).map_err(ForecastError::Parse)?;
        let forecast = parsed.into_forecast()?;

        debug!(
            timezone = %forecast.timezone,
            hours = forecast.hourly.time.len(),
            days = forecast.daily.time.len(),
            "forecast fetched"
        );
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "latitude": 35.7,
            "longitude": 139.6875,
            "timezone": "Asia/Tokyo",
            "utc_offset_seconds": 32400,
            "current_units": { "temperature_2m": "°C", "wind_speed_10m": "km/h" },
            "current": {
                "time": "2025-03-01T09:15",
                "temperature_2m": 8.4,
                "relative_humidity_2m": 41,
                "apparent_temperature": 5.1,
                "weather_code": 2,
                "wind_speed_10m": 11.2,
                "wind_direction_10m": 320,
                "is_day": 1
            },
            "hourly": {
                "time": ["2025-03-01T00:00", "2025-03-01T01:00"],
                "temperature_2m": [4.0, 3.6],
                "apparent_temperature": [1.2, 0.9],
                "precipitation_probability": [0, 5],
                "wind_speed_10m": [6.1, null]
            },
            "daily": {
                "time": ["2025-03-01", "2025-03-02"],
                "weather_code": [2, 61],
                "temperature_2m_max": [12.0, 9.5],
                "temperature_2m_min": [3.1, 4.0],
                "apparent_temperature_max": [9.0, 6.2],
                "apparent_temperature_min": [0.2, 1.1],
                "wind_speed_10m_max": [18.0, 22.4]
            }
        })
    }

    fn parse(value: serde_json::Value) -> Result<Forecast, ForecastError> {
        let api: ApiResponse = serde_json::from_value(value).expect("wire schema");
        api.into_forecast()
    }

    #[test]
    fn converts_full_response() {
        let forecast = parse(sample()).expect("valid forecast");

        assert_eq!(forecast.timezone, "Asia/Tokyo");
        assert_eq!(forecast.current.weather_code, 2);
        assert_eq!(forecast.current.humidity, Some(41.0));
        assert!(forecast.current.is_day);
        assert_eq!(forecast.current.time.offset().local_minus_utc(), 32400);
        assert_eq!(forecast.current.time.hour(), 9);

        assert_eq!(forecast.hourly.time.len(), 2);
        assert_eq!(forecast.hourly.wind_speed, Some(vec![Some(6.1), None]));
        assert_eq!(forecast.daily.time[1].day(), 2);
        assert_eq!(forecast.daily.weather_code, Some(vec![Some(2), Some(61)]));
        assert_eq!(forecast.units.temperature, "°C");
    }

    #[test]
    fn hourly_times_are_anchored_to_response_offset() {
        let forecast = parse(sample()).expect("valid forecast");
        let first = forecast.hourly.time[0];
        // 00:00 in UTC+9 is 15:00 UTC the previous day.
        assert_eq!(first.naive_utc().to_string(), "2025-02-28 15:00:00");
    }

    #[test]
    fn missing_optional_arrays_are_absent() {
        let mut value = sample();
        value["daily"].as_object_mut().expect("daily").remove("apparent_temperature_max");
        value["daily"].as_object_mut().expect("daily").remove("wind_speed_10m_max");
        value["hourly"].as_object_mut().expect("hourly").remove("apparent_temperature");

        let forecast = parse(value).expect("still valid");
        assert!(forecast.daily.feels_like_max.is_none());
        assert!(forecast.daily.wind_speed_max.is_none());
        assert!(forecast.daily.feels_like_min.is_some());
        assert!(forecast.hourly.feels_like.is_none());
    }

    #[test]
    fn inconsistent_optional_array_is_dropped() {
        let mut value = sample();
        value["daily"]["wind_speed_10m_max"] = json!([18.0]);

        let forecast = parse(value).expect("still valid");
        assert!(forecast.daily.wind_speed_max.is_none());
    }

    #[test]
    fn inconsistent_required_array_is_an_error() {
        let mut value = sample();
        value["hourly"]["temperature_2m"] = json!([4.0]);

        let err = parse(value).unwrap_err();
        assert!(matches!(err, ForecastError::Malformed(_)));
        assert!(err.to_string().contains("hourly.temperature_2m"));
    }

    #[test]
    fn null_temperature_samples_are_kept_as_gaps() {
        let mut value = sample();
        value["hourly"]["temperature_2m"] = json!([4.0, null]);
        value["daily"]["temperature_2m_min"] = json!([null, 4.0]);

        let forecast = parse(value).expect("nulls do not fail the forecast");
        assert_eq!(forecast.hourly.temperature, vec![Some(4.0), None]);
        assert_eq!(forecast.daily.temperature_min, vec![None, Some(4.0)]);
    }

    #[test]
    fn missing_block_is_an_error() {
        let mut value = sample();
        value.as_object_mut().expect("root").remove("daily");

        let err = parse(value).unwrap_err();
        assert!(err.to_string().contains("daily"));
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let mut value = sample();
        value["hourly"]["time"] = json!(["yesterday", "2025-03-01T01:00"]);

        assert!(matches!(parse(value), Err(ForecastError::Malformed(_))));
    }

    #[test]
    fn units_fall_back_to_service_defaults() {
        let mut value = sample();
        value.as_object_mut().expect("root").remove("current_units");

        let forecast = parse(value).expect("valid forecast");
        assert_eq!(forecast.units, Units::default());
    }

    #[test]
    fn query_carries_all_variable_groups() {
        let client = OpenMeteoForecast::new(&Config::default()).expect("client");
        let query = client.query(35.6895, 139.6917);

        let get = |key: &str| query.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str());
        assert_eq!(get("latitude"), Some("35.6895"));
        assert_eq!(get("longitude"), Some("139.6917"));
        assert_eq!(get("timezone"), Some("auto"));
        assert!(get("current").is_some_and(|v| v.contains("is_day")));
        assert!(get("hourly").is_some_and(|v| v.contains("precipitation_probability")));
        assert!(get("daily").is_some_and(|v| v.contains("wind_speed_10m_max")));
        assert_eq!(get("wind_speed_unit"), None);
    }

    #[test]
    fn query_includes_configured_wind_unit() {
        let cfg = Config {
            wind_speed_unit: Some("ms".into()),
            ..Config::default()
        };
        let client = OpenMeteoForecast::new(&cfg).expect("client");
        assert!(client.query(0.0, 0.0).contains(&("wind_speed_unit", "ms".to_string())));
    }

    #[test]
    fn coordinates_are_validated() {
        assert!(OpenMeteoForecast::validate_coordinates(90.0, 180.0).is_ok());
        assert!(OpenMeteoForecast::validate_coordinates(-90.0, -180.0).is_ok());
        assert!(OpenMeteoForecast::validate_coordinates(90.5, 0.0).is_err());
        assert!(OpenMeteoForecast::validate_coordinates(0.0, -180.5).is_err());
    }
}
