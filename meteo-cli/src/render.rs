//! Plain-text rendering of candidates and dashboard snapshots.

use meteo_core::{DailyPoint, ForecastPoint, SearchCandidate, Snapshot};

use crate::cli::View;

const MISSING: &str = "-";

/// Terminal glyph for a classification icon.
pub fn glyph(icon_id: &str, is_day: bool) -> &'static str {
    match icon_id {
        "sun" if is_day => "☀",
        "sun" => "☾",
        "cloud" => "☁",
        "cloud-fog" => "🌫",
        "cloud-drizzle" => "🌦",
        "cloud-rain" => "🌧",
        "cloud-snow" => "🌨",
        "cloud-lightning" => "⛈",
        _ => "?",
    }
}

/// Eight-point compass direction for a bearing in degrees.
pub fn cardinal(degrees: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let sector = (degrees.rem_euclid(360.0) / 45.0).round() as usize % POINTS.len();
    POINTS[sector]
}

fn value(v: Option<f64>, unit: &str) -> String {
    match v {
        Some(v) => format!("{v:.1}{unit}"),
        None => MISSING.to_string(),
    }
}

/// Numbered list, 1-based, as accepted by `:<n>` in browse mode.
pub fn candidates(list: &[SearchCandidate]) -> String {
    list.iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{:>2}. {}  ({:.4}, {:.4})\n",
                i + 1,
                c.display_name(),
                c.latitude,
                c.longitude
            )
        })
        .collect()
}

pub fn current(snapshot: &Snapshot) -> String {
    let now = &snapshot.current.conditions;
    let class = &snapshot.current.classification;
    let units = &snapshot.units;

    let mut out = format!("{}  ({})\n", snapshot.place.name, snapshot.timezone);
    out.push_str(&format!(
        "  {} {}  {:.1}{}",
        glyph(class.icon_id, now.is_day),
        class.label,
        now.temperature,
        units.temperature
    ));
    if let Some(feels) = now.feels_like {
        out.push_str(&format!(" (feels like {feels:.1}{})", units.temperature));
    }
    out.push('\n');

    let humidity = now
        .humidity
        .map_or_else(|| MISSING.to_string(), |h| format!("{h:.0}%"));
    let wind = match (now.wind_speed, now.wind_direction) {
        (Some(speed), Some(dir)) => format!("{speed:.1} {} {}", units.wind_speed, cardinal(dir)),
        (Some(speed), None) => format!("{speed:.1} {}", units.wind_speed),
        (None, _) => MISSING.to_string(),
    };
    out.push_str(&format!("  Humidity {humidity}  Wind {wind}\n"));
    out.push_str(&format!("  Observed {}\n", now.time.format("%Y-%m-%d %H:%M")));
    out
}

fn hourly_row(p: &ForecastPoint, temp_unit: &str, wind_unit: &str) -> String {
    format!(
        "{:<6} {:>9} {:>9} {:>7} {:>12}\n",
        p.label,
        value(Some(p.temperature), temp_unit),
        value(p.feels_like, temp_unit),
        p.precipitation_probability
            .map_or_else(|| MISSING.to_string(), |v| format!("{v:.0}%")),
        value(p.wind_speed, &format!(" {wind_unit}")),
    )
}

pub fn hourly(snapshot: &Snapshot) -> String {
    if snapshot.hourly.is_empty() {
        return "No hourly data.\n".to_string();
    }

    let units = &snapshot.units;
    let mut out = format!(
        "{:<6} {:>9} {:>9} {:>7} {:>12}\n",
        "Time", "Temp", "Feels", "Precip", "Wind"
    );
    for point in &snapshot.hourly {
        out.push_str(&hourly_row(point, &units.temperature, &units.wind_speed));
    }
    out
}

fn daily_row(p: &DailyPoint, temp_unit: &str, wind_unit: &str) -> String {
    let condition = p.condition.map_or_else(
        || MISSING.to_string(),
        |c| format!("{} {}", glyph(c.icon_id, true), c.label),
    );
    let feels = match (p.feels_like_min, p.feels_like_max) {
        (None, None) => MISSING.to_string(),
        (min, max) => format!("{} / {}", value(min, temp_unit), value(max, temp_unit)),
    };

    format!(
        "{:<11} {:<18} {:>9} / {:<9} feels {:<20} wind {}\n",
        p.label,
        condition,
        value(Some(p.temperature_min), temp_unit),
        value(Some(p.temperature_max), temp_unit),
        feels,
        value(p.wind_speed_max, &format!(" {wind_unit}")),
    )
}

pub fn weekly(snapshot: &Snapshot) -> String {
    if snapshot.daily.is_empty() {
        return "No daily data.\n".to_string();
    }

    let units = &snapshot.units;
    snapshot
        .daily
        .iter()
        .map(|p| daily_row(p, &units.temperature, &units.wind_speed))
        .collect()
}

pub fn snapshot(snapshot: &Snapshot, view: View) -> String {
    match view {
        View::Now => current(snapshot),
        View::Hourly => hourly(snapshot),
        View::Weekly => weekly(snapshot),
        View::All => format!(
            "{}\nNext 24 hours\n{}\nThis week\n{}",
            current(snapshot),
            hourly(snapshot),
            weekly(snapshot)
        ),
    }
}
