//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, FixedOffset, NaiveDate, TimeZone};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::time::Instant;

use crate::{
    error::{ForecastError, GeocodeError},
    forecast::{CurrentConditions, DailySeries, Forecast, ForecastSource, HourlySeries, Units},
    geocoding::Geocoder,
    model::SearchCandidate,
};

pub fn candidate(id: i64) -> SearchCandidate {
    SearchCandidate {
        id,
        name: format!("place-{id}"),
        latitude: 35.0,
        longitude: 139.0,
        country: "日本".into(),
        region: None,
    }
}

pub fn ids(candidates: &[SearchCandidate]) -> Vec<i64> {
    candidates.iter().map(|c| c.id).collect()
}

#[derive(Debug, Clone)]
enum Reply {
    Found(Vec<i64>),
    Fail,
}

/// Geocoder answering from a table, optionally after a per-query delay.
/// Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct FakeGeocoder {
    replies: HashMap<String, Reply>,
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, ids: &[i64]) -> Self {
        self.replies.insert(query.to_string(), Reply::Found(ids.to_vec()));
        self
    }

    pub fn failing(mut self, query: &str) -> Self {
        self.replies.insert(query.to_string(), Reply::Fail);
        self
    }

    pub fn delayed(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().expect("call log").clone()
    }

    pub fn called_queries(&self) -> Vec<String> {
        self.calls().into_iter().map(|(q, _)| q).collect()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn lookup(&self, name: &str) -> Result<Vec<SearchCandidate>, GeocodeError> {
        self.calls
            .lock()
            .expect("call log")
            .push((name.to_string(), Instant::now()));

        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }

        match self.replies.get(name) {
            Some(Reply::Found(ids)) => Ok(ids.iter().copied().map(candidate).collect()),
            Some(Reply::Fail) => Err(GeocodeError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".into(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Two days of hourly data and a week of daily data for Tokyo, starting
/// 2025-03-01 00:00 JST.
pub fn sample_forecast() -> Forecast {
    let jst = FixedOffset::east_opt(9 * 3600).expect("valid offset");
    let start = jst.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let first_day = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");

    Forecast {
        latitude: 35.7,
        longitude: 139.6875,
        timezone: "Asia/Tokyo".into(),
        utc_offset_seconds: 9 * 3600,
        current: CurrentConditions {
            time: start + ChronoDuration::minutes(15),
            temperature: 8.4,
            feels_like: Some(5.1),
            humidity: Some(41.0),
            weather_code: 2,
            wind_speed: Some(11.2),
            wind_direction: Some(320.0),
            is_day: true,
        },
        hourly: HourlySeries {
            time: (0..48).map(|h| start + ChronoDuration::hours(h)).collect(),
            temperature: (0..48).map(|h| Some(4.0 + (h % 24) as f64 / 2.0)).collect(),
            feels_like: Some((0..48).map(|h| Some(1.0 + (h % 24) as f64 / 2.0)).collect()),
            precipitation_probability: Some(vec![Some(10.0); 48]),
            wind_speed: Some(vec![Some(6.5); 48]),
        },
        daily: DailySeries {
            time: (0..7).map(|d| first_day + ChronoDuration::days(d)).collect(),
            weather_code: Some([2, 61, 3, 0, 80, 71, 45].map(Some).to_vec()),
            temperature_max: [12.0, 9.5, 11.0, 14.2, 10.1, 4.3, 8.8].map(Some).to_vec(),
            temperature_min: [3.1, 4.0, 2.2, 5.0, 6.3, -1.0, 0.5].map(Some).to_vec(),
            feels_like_max: Some(vec![Some(9.0); 7]),
            feels_like_min: Some(vec![Some(0.2); 7]),
            wind_speed_max: Some(vec![Some(18.0); 7]),
        },
        units: Units::default(),
    }
}

#[derive(Debug, Default)]
struct FakeForecastState {
    failing: bool,
    requests: Vec<(f64, f64)>,
}

/// Forecast source returning a fixed forecast, or failing on demand.
/// Clones share state.
#[derive(Debug, Clone)]
pub struct FakeForecast {
    forecast: Forecast,
    state: Arc<Mutex<FakeForecastState>>,
}

impl FakeForecast {
    pub fn ok(forecast: Forecast) -> Self {
        Self {
            forecast,
            state: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        let fake = Self::ok(sample_forecast());
        fake.set_failing(true);
        fake
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().expect("fake state").failing = failing;
    }

    pub fn requests(&self) -> Vec<(f64, f64)> {
        self.state.lock().expect("fake state").requests.clone()
    }
}

#[async_trait]
impl ForecastSource for FakeForecast {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Forecast, ForecastError> {
        let mut state = self.state.lock().expect("fake state");
        state.requests.push((latitude, longitude));

        if state.failing {
            return Err(ForecastError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "maintenance".into(),
            });
        }
        Ok(self.forecast.clone())
    }
}
