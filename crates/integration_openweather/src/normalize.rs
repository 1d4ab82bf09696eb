//! Provider payload normalization
//!
//! Pure mapping from decoded provider bodies to the entity models. Both
//! data sources go through these functions, so mock and live results have
//! identical shape. Rules:
//! - unix seconds become epoch milliseconds
//! - 0-1 probability fractions become 0-100 percentages
//! - absent auxiliary numbers (rain, snow, uvi, humidity, wind) become 0

use crate::error::{Operation, WeatherError};
use crate::models::{Coordinate, DailyForecastEntry, HourlyForecastEntry, WeatherSnapshot};
use crate::payload::{
    AirPollutionPayload, ConditionPayload, CurrentPayload, DailyPayload, ForecastItemPayload,
    ForecastPayload, OneCallPayload, VolumePayload,
};

const MILLIS_PER_SECOND: i64 = 1000;

/// Convert provider unix seconds to epoch milliseconds
#[must_use]
pub const fn seconds_to_millis(seconds: i64) -> i64 {
    seconds.saturating_mul(MILLIS_PER_SECOND)
}

/// Scale a 0-1 provider fraction to a 0-100 percentage
#[must_use]
pub fn fraction_to_percent(fraction: Option<f64>) -> f64 {
    fraction.unwrap_or(0.0) * 100.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn humidity_percent(humidity: Option<f64>) -> u8 {
    humidity.unwrap_or(0.0).round().clamp(0.0, 100.0) as u8
}

fn first_condition(
    operation: Operation,
    conditions: &[ConditionPayload],
) -> Result<&ConditionPayload, WeatherError> {
    conditions
        .first()
        .ok_or_else(|| WeatherError::normalization(operation, "missing weather condition"))
}

fn three_hour_volume(volume: Option<&VolumePayload>) -> f64 {
    volume.and_then(|v| v.three_hours).unwrap_or(0.0)
}

/// Normalize a `/weather` body; `fetched_at_ms` becomes the snapshot timestamp
pub fn snapshot_from_current(
    payload: &CurrentPayload,
    fetched_at_ms: i64,
) -> Result<WeatherSnapshot, WeatherError> {
    let operation = Operation::CurrentWeather;
    let condition = first_condition(operation, &payload.weather)?;
    let feels_like = payload
        .main
        .feels_like
        .ok_or_else(|| WeatherError::normalization(operation, "missing field `main.feels_like`"))?;

    Ok(WeatherSnapshot {
        temperature: payload.main.temp,
        feels_like,
        humidity: humidity_percent(payload.main.humidity),
        wind_speed: payload.wind.as_ref().and_then(|w| w.speed).unwrap_or(0.0),
        description: condition.description.clone(),
        icon: condition.icon.clone(),
        timestamp: fetched_at_ms,
        coordinate: payload.coord.map(|c| Coordinate::new(c.lat, c.lon)),
    })
}

fn hourly_entry(item: &ForecastItemPayload) -> Result<HourlyForecastEntry, WeatherError> {
    let condition = first_condition(Operation::HourlyForecast, &item.weather)?;

    Ok(HourlyForecastEntry {
        timestamp: seconds_to_millis(item.dt),
        precipitation_probability: fraction_to_percent(item.pop),
        rain: three_hour_volume(item.rain.as_ref()),
        snow: three_hour_volume(item.snow.as_ref()),
        temperature: item.main.temp,
        icon: condition.icon.clone(),
    })
}

/// Normalize a `/forecast` body, keeping the provider's order
///
/// Any malformed item fails the whole call.
pub fn hourly_from_forecast(
    payload: &ForecastPayload,
) -> Result<Vec<HourlyForecastEntry>, WeatherError> {
    payload.list.iter().map(hourly_entry).collect()
}

fn daily_entry(day: &DailyPayload) -> Result<DailyForecastEntry, WeatherError> {
    let condition = first_condition(Operation::DailyForecast, &day.weather)?;

    Ok(DailyForecastEntry {
        date: seconds_to_millis(day.dt),
        sunrise: seconds_to_millis(day.sunrise.unwrap_or(0)),
        sunset: seconds_to_millis(day.sunset.unwrap_or(0)),
        temp_min: day.temp.min,
        temp_max: day.temp.max,
        temp_day: day.temp.day,
        temp_night: day.temp.night,
        description: condition.description.clone(),
        icon: condition.icon.clone(),
        precipitation_probability: fraction_to_percent(day.pop),
        rain: day.rain.unwrap_or(0.0),
        snow: day.snow.unwrap_or(0.0),
        humidity: humidity_percent(day.humidity),
        wind_speed: day.wind_speed.unwrap_or(0.0),
        wind_direction: day.wind_deg.unwrap_or(0.0),
        uv_index: day.uvi.unwrap_or(0.0),
    })
}

/// Normalize `onecall.daily`; an absent section is an empty forecast
pub fn daily_from_one_call(
    payload: &OneCallPayload,
) -> Result<Vec<DailyForecastEntry>, WeatherError> {
    payload
        .daily
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(daily_entry)
        .collect()
}

/// Read `onecall.current.uvi`, 0 when absent
#[must_use]
pub fn uv_index_from_one_call(payload: &OneCallPayload) -> f64 {
    payload
        .current
        .as_ref()
        .and_then(|c| c.uvi)
        .unwrap_or(0.0)
}

/// Read the index of the first pollution sample
pub fn aqi_from_air_pollution(payload: &AirPollutionPayload) -> Result<u8, WeatherError> {
    payload
        .list
        .first()
        .map(|item| item.main.aqi)
        .ok_or_else(|| WeatherError::normalization(Operation::AirQuality, "empty pollution list"))
}
