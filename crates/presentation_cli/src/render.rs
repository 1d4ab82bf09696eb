//! Text rendering for terminal output

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use integration_openweather::{
    DailyForecastEntry, HourlyForecastEntry, TemperatureUnit, WeatherSnapshot, format_temperature,
};
use serde::Serialize;

/// Everything the dashboard shows, as loaded by one refresh
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub location: String,
    pub unit: TemperatureUnit,
    pub current: Option<WeatherSnapshot>,
    pub hourly: Vec<HourlyForecastEntry>,
    pub daily: Vec<DailyForecastEntry>,
    pub uv_index: Option<f64>,
    pub aqi: Option<u8>,
    pub error: Option<String>,
}

/// UV exposure category on the WHO scale
pub fn uv_category(uv_index: f64) -> &'static str {
    match uv_index {
        x if x < 3.0 => "Low",
        x if x < 6.0 => "Moderate",
        x if x < 8.0 => "High",
        x if x < 11.0 => "Very high",
        _ => "Extreme",
    }
}

/// Label for the OpenWeatherMap 1-5 air quality scale
pub const fn aqi_label(aqi: u8) -> &'static str {
    match aqi {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very poor",
        _ => "Unknown",
    }
}

fn format_time(at: Option<DateTime<Utc>>, pattern: &str) -> String {
    at.map_or_else(|| "-".to_string(), |t| t.format(pattern).to_string())
}

pub fn current(snapshot: &WeatherSnapshot, unit: TemperatureUnit) -> String {
    let mut out = format!(
        "🌡️  {} (feels like {}), {}\n",
        format_temperature(snapshot.temperature, unit),
        format_temperature(snapshot.feels_like, unit),
        snapshot.description
    );
    let _ = writeln!(
        out,
        "   Humidity {}%, wind {:.1} m/s",
        snapshot.humidity, snapshot.wind_speed
    );
    if let Some(coordinate) = snapshot.coordinate {
        let _ = writeln!(out, "   📍 {coordinate}");
    }
    let _ = writeln!(
        out,
        "   Fetched {} UTC",
        format_time(snapshot.captured_at(), "%Y-%m-%d %H:%M")
    );
    out
}

pub fn hourly(entries: &[HourlyForecastEntry], unit: TemperatureUnit) -> String {
    if entries.is_empty() {
        return "No hourly forecast available\n".to_string();
    }

    let mut out = String::from("🕒 Hourly forecast (UTC):\n");
    for entry in entries {
        let _ = write!(
            out,
            "   {}  {:>5}  precip {:>3.0}%",
            format_time(entry.forecast_at(), "%a %d %H:%M"),
            format_temperature(entry.temperature, unit),
            entry.precipitation_probability
        );
        if entry.rain > 0.0 {
            let _ = write!(out, "  rain {:.1}mm", entry.rain);
        }
        if entry.snow > 0.0 {
            let _ = write!(out, "  snow {:.1}mm", entry.snow);
        }
        out.push('\n');
    }
    out
}

pub fn daily(entries: &[DailyForecastEntry], unit: TemperatureUnit) -> String {
    if entries.is_empty() {
        return "No daily forecast available\n".to_string();
    }

    let mut out = String::from("📅 Daily forecast:\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "   {}  {:>5} / {:<5}  {}, precip {:.0}%, UV {:.1}, sun {}-{}",
            format_time(entry.date_at(), "%a %d %b"),
            format_temperature(entry.temp_max, unit),
            format_temperature(entry.temp_min, unit),
            entry.description,
            entry.precipitation_probability,
            entry.uv_index,
            format_time(entry.sunrise_at(), "%H:%M"),
            format_time(entry.sunset_at(), "%H:%M")
        );
    }
    out
}

pub fn uv(uv_index: f64) -> String {
    format!("☀️  UV index {uv_index:.1} ({})\n", uv_category(uv_index))
}

pub fn aqi(aqi: u8) -> String {
    format!("🌫️  Air quality {aqi}/5 ({})\n", aqi_label(aqi))
}

pub fn dashboard(view: &DashboardView) -> String {
    let mut out = format!("📊 Weather for {}\n\n", view.location);

    match &view.current {
        Some(snapshot) => out.push_str(&current(snapshot, view.unit)),
        None => out.push_str("Current conditions unavailable\n"),
    }
    if let Some(uv_index) = view.uv_index {
        out.push_str(&uv(uv_index));
    }
    if let Some(index) = view.aqi {
        out.push_str(&aqi(index));
    }
    out.push('\n');
    out.push_str(&hourly(&view.hourly, view.unit));
    out.push('\n');
    out.push_str(&daily(&view.daily, view.unit));

    if let Some(error) = &view.error {
        let _ = write!(out, "\n⚠️  {error}\n");
    }
    out
}
