//! OpenWeatherMap weather integration
//!
//! Data-access layer for current conditions, hourly and daily forecasts, UV
//! index and air quality from OpenWeatherMap (<https://openweathermap.org>).
//! Without an API key the service answers from a bundled sample dataset, run
//! through the same normalization as live responses. OneCall bundles are
//! cached per coordinate pair for a configurable TTL.

pub mod cache;
pub mod client;
pub mod error;
mod models;
pub mod normalize;
pub mod payload;
pub mod source;
pub mod state;
pub mod units;

pub use cache::{Clock, DEFAULT_ONE_CALL_TTL, ManualClock, OneCallCache, SystemClock, cache_key};
pub use client::{WeatherClient, WeatherConfig, WeatherService};
pub use error::{Operation, WeatherError};
pub use models::{Coordinate, DailyForecastEntry, HourlyForecastEntry, WeatherSnapshot};
pub use source::{DataMode, LiveSource, StaticSource, WeatherSource};
pub use state::WeatherState;
pub use units::{TemperatureUnit, format_temperature, to_celsius, to_fahrenheit};
