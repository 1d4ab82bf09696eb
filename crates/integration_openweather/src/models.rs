//! Weather data models
//!
//! Normalized entity shapes handed to callers. Every value here is built
//! fresh by the normalization step and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Convert epoch milliseconds to a UTC datetime
fn datetime_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current weather conditions for a named location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Provider condition text, e.g. "light rain"
    pub description: String,
    /// Provider icon token, e.g. "10d"
    pub icon: String,
    /// When the snapshot was fetched (epoch milliseconds)
    pub timestamp: i64,
    /// Location of the observing station, when the provider reports one
    pub coordinate: Option<Coordinate>,
}

impl WeatherSnapshot {
    /// Fetch time as a UTC datetime
    #[must_use]
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        datetime_from_millis(self.timestamp)
    }
}

/// One 3-hour step of the 5-day forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecastEntry {
    /// Forecast time (epoch milliseconds)
    pub timestamp: i64,
    /// Probability of precipitation (0-100)
    pub precipitation_probability: f64,
    /// Rain volume in mm
    pub rain: f64,
    /// Snow volume in mm
    pub snow: f64,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Provider icon token
    pub icon: String,
}

impl HourlyForecastEntry {
    #[must_use]
    pub fn forecast_at(&self) -> Option<DateTime<Utc>> {
        datetime_from_millis(self.timestamp)
    }
}

/// One day of the OneCall daily forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    /// Forecast day (epoch milliseconds)
    pub date: i64,
    /// Sunrise (epoch milliseconds, 0 when the sun does not rise)
    pub sunrise: i64,
    /// Sunset (epoch milliseconds, 0 when the sun does not set)
    pub sunset: i64,
    /// Minimum temperature in Celsius
    pub temp_min: f64,
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Day temperature in Celsius
    pub temp_day: f64,
    /// Night temperature in Celsius
    pub temp_night: f64,
    /// Provider condition text
    pub description: String,
    /// Provider icon token
    pub icon: String,
    /// Probability of precipitation (0-100)
    pub precipitation_probability: f64,
    /// Rain volume in mm
    pub rain: f64,
    /// Snow volume in mm
    pub snow: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360)
    pub wind_direction: f64,
    /// Maximum UV index
    pub uv_index: f64,
}

impl DailyForecastEntry {
    #[must_use]
    pub fn date_at(&self) -> Option<DateTime<Utc>> {
        datetime_from_millis(self.date)
    }

    #[must_use]
    pub fn sunrise_at(&self) -> Option<DateTime<Utc>> {
        datetime_from_millis(self.sunrise)
    }

    #[must_use]
    pub fn sunset_at(&self) -> Option<DateTime<Utc>> {
        datetime_from_millis(self.sunset)
    }
}
