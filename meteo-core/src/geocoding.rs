use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{debug, instrument};

use crate::{
    config::Config,
    error::{GeocodeError, truncate_body},
    model::SearchCandidate,
};

/// One lookup against a geocoding service.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn lookup(&self, name: &str) -> Result<Vec<SearchCandidate>, GeocodeError>;
}

/// Open-Meteo geocoding API client.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    url: String,
    count: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    /// Absent when nothing matched.
    #[serde(default)]
    results: Option<Vec<SearchCandidate>>,
}

impl OpenMeteoGeocoder {
    pub fn new(config: &Config) -> Result<Self, GeocodeError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            url: config.geocoding_url.clone(),
            count: config.result_count.to_string(),
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    #[instrument(skip(self))]
    async fn lookup(&self, name: &str) -> Result<Vec<SearchCandidate>, GeocodeError> {
        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("name", name),
                ("count", self.count.as_str()),
                ("language", self.language.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(GeocodeError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: GeocodingResponse = serde_json::from_str(&body).map_err(GeocodeError::Parse)?;
        let results = parsed.results.unwrap_or_default();

        debug!(count = results.len(), "geocoding lookup finished");
        Ok(results)
    }
}
