//! WMO weather code interpretation.
//!
//! Codes follow the Open-Meteo documentation: <https://open-meteo.com/en/docs>

use serde::Serialize;

/// Display triple for a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherClassification {
    pub label: &'static str,
    /// Icon identifier (Lucide icon names).
    pub icon_id: &'static str,
    /// Hex display color, e.g. `#f59e0b`.
    pub color: &'static str,
}

struct CodeRange {
    start: i32,
    end: i32,
    class: WeatherClassification,
}

const fn entry(
    start: i32,
    end: i32,
    label: &'static str,
    icon_id: &'static str,
    color: &'static str,
) -> CodeRange {
    CodeRange {
        start,
        end,
        class: WeatherClassification { label, icon_id, color },
    }
}

/// Inclusive ranges, ascending by start. First match wins.
/// WMO codes stop at 99; anything above is unknown.
static CODE_TABLE: [CodeRange; 9] = [
    entry(0, 0, "clear", "sun", "#f59e0b"),
    entry(1, 3, "partly cloudy", "cloud", "#94a3b8"),
    entry(45, 48, "fog", "cloud-fog", "#64748b"),
    entry(51, 57, "drizzle", "cloud-drizzle", "#38bdf8"),
    entry(61, 67, "rain", "cloud-rain", "#3b82f6"),
    entry(71, 77, "snow", "cloud-snow", "#e2e8f0"),
    entry(80, 82, "rain showers", "cloud-rain", "#60a5fa"),
    entry(85, 86, "snow showers", "cloud-snow", "#cbd5e1"),
    entry(95, 99, "thunderstorm", "cloud-lightning", "#f43f5e"),
];

pub const UNKNOWN: WeatherClassification = WeatherClassification {
    label: "unknown",
    icon_id: "cloud",
    color: "#94a3b8",
};

/// Classify a weather code. Total: codes outside the table map to [`UNKNOWN`].
pub fn classify(code: i32) -> WeatherClassification {
    CODE_TABLE
        .iter()
        .find(|range| (range.start..=range.end).contains(&code))
        .map(|range| range.class)
        .unwrap_or(UNKNOWN)
}
