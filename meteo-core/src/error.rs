//! Error types for the HTTP collaborators.

use thiserror::Error;

/// Failure of a single geocoding lookup.
///
/// Location search swallows these; they exist so a lookup branch can be
/// logged with a reason before it is counted as zero results.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoding service returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("failed to parse geocoding response: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Failure of a forecast fetch. Propagated to the caller so the front-end
/// can show a "data unavailable" state.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(
        "invalid coordinates ({latitude}, {longitude}): latitude must be -90..=90, longitude -180..=180"
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("forecast request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("forecast service returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("failed to parse forecast response: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("malformed forecast data: {0}")]
    Malformed(String),
}

impl ForecastError {
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::Malformed(message.into())
    }
}

/// Cut a response body down to something fit for an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_is_kept() {
        assert_eq!(truncate_body("bad request"), "bad request");
    }

    #[test]
    fn long_body_is_cut_on_char_boundary() {
        let body = "雨".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn coordinates_error_mentions_both_axes() {
        let err = ForecastError::InvalidCoordinates { latitude: 91.0, longitude: 0.0 };
        let msg = err.to_string();
        assert!(msg.contains("latitude"));
        assert!(msg.contains("longitude"));
    }

    #[test]
    fn malformed_helper() {
        let err = ForecastError::malformed("hourly.temperature_2m has 3 values, expected 4");
        assert!(matches!(err, ForecastError::Malformed(_)));
        assert!(err.to_string().contains("expected 4"));
    }
}
