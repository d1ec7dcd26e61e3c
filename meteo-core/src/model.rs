use serde::{Deserialize, Serialize};

/// A geocoded place returned by location search.
///
/// `id` is assigned by the geocoding service and is the only identity used
/// when merging results from several lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: String,
    /// First-level administrative area (`admin1` on the wire).
    #[serde(default, rename = "admin1", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl SearchCandidate {
    /// "name, region, country" or "name, country" when no region is known.
    pub fn display_name(&self) -> String {
        match self.region.as_deref().filter(|r| !r.is_empty()) {
            Some(region) => format!("{}, {}, {}", self.name, region, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

/// A location the dashboard can load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn tokyo() -> Self {
        Self::new("Tokyo, Japan", 35.6895, 139.6917)
    }
}

impl Default for Place {
    fn default() -> Self {
        Self::tokyo()
    }
}

impl From<&SearchCandidate> for Place {
    fn from(candidate: &SearchCandidate) -> Self {
        Self::new(candidate.display_name(), candidate.latitude, candidate.longitude)
    }
}
