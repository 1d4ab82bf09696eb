//! Observable weather state
//!
//! Named `tokio::sync::watch` containers a UI can subscribe to. Each
//! successful operation writes its own container; failures are published as
//! a message in `error` and leave previously written data in place.

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::client::WeatherClient;
use crate::error::WeatherError;
use crate::models::{Coordinate, DailyForecastEntry, HourlyForecastEntry, WeatherSnapshot};
use crate::units::TemperatureUnit;

/// Reactive containers for everything the weather view shows
#[derive(Debug)]
pub struct WeatherState {
    current: watch::Sender<Option<WeatherSnapshot>>,
    hourly: watch::Sender<Vec<HourlyForecastEntry>>,
    daily: watch::Sender<Vec<DailyForecastEntry>>,
    uv_index: watch::Sender<Option<f64>>,
    aqi: watch::Sender<Option<u8>>,
    unit: watch::Sender<TemperatureUnit>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the first failure, drop the rest
fn record<T>(
    first_error: &mut Option<WeatherError>,
    result: Result<T, WeatherError>,
    write: impl FnOnce(T),
) {
    match result {
        Ok(value) => write(value),
        Err(e) => {
            if first_error.is_none() {
                *first_error = Some(e);
            }
        },
    }
}

impl WeatherState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: watch::Sender::new(None),
            hourly: watch::Sender::new(Vec::new()),
            daily: watch::Sender::new(Vec::new()),
            uv_index: watch::Sender::new(None),
            aqi: watch::Sender::new(None),
            unit: watch::Sender::new(TemperatureUnit::default()),
            loading: watch::Sender::new(false),
            error: watch::Sender::new(None),
        }
    }

    pub fn subscribe_current(&self) -> watch::Receiver<Option<WeatherSnapshot>> {
        self.current.subscribe()
    }

    pub fn subscribe_hourly(&self) -> watch::Receiver<Vec<HourlyForecastEntry>> {
        self.hourly.subscribe()
    }

    pub fn subscribe_daily(&self) -> watch::Receiver<Vec<DailyForecastEntry>> {
        self.daily.subscribe()
    }

    pub fn subscribe_uv_index(&self) -> watch::Receiver<Option<f64>> {
        self.uv_index.subscribe()
    }

    pub fn subscribe_aqi(&self) -> watch::Receiver<Option<u8>> {
        self.aqi.subscribe()
    }

    pub fn subscribe_unit(&self) -> watch::Receiver<TemperatureUnit> {
        self.unit.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> Option<WeatherSnapshot> {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn hourly(&self) -> Vec<HourlyForecastEntry> {
        self.hourly.borrow().clone()
    }

    #[must_use]
    pub fn daily(&self) -> Vec<DailyForecastEntry> {
        self.daily.borrow().clone()
    }

    #[must_use]
    pub fn uv_index(&self) -> Option<f64> {
        *self.uv_index.borrow()
    }

    #[must_use]
    pub fn aqi(&self) -> Option<u8> {
        *self.aqi.borrow()
    }

    #[must_use]
    pub fn unit(&self) -> TemperatureUnit {
        *self.unit.borrow()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn set_unit(&self, unit: TemperatureUnit) {
        self.unit.send_replace(unit);
    }

    /// Switch between Celsius and Fahrenheit, returning the new unit
    pub fn toggle_unit(&self) -> TemperatureUnit {
        self.unit.send_modify(|unit| *unit = unit.toggled());
        self.unit()
    }

    /// Clear every data container; the display unit is kept
    pub fn reset(&self) {
        self.current.send_replace(None);
        self.hourly.send_replace(Vec::new());
        self.daily.send_replace(Vec::new());
        self.uv_index.send_replace(None);
        self.aqi.send_replace(None);
    }

    /// Load everything for `location`
    ///
    /// Current weather is fetched first; its coordinate drives the daily,
    /// UV and AQI requests, which run concurrently with the hourly one. The
    /// first failure is stored in `error` and returned.
    #[instrument(skip(self, client))]
    pub async fn refresh(
        &self,
        client: &dyn WeatherClient,
        location: &str,
    ) -> Result<(), WeatherError> {
        self.loading.send_replace(true);
        self.error.send_replace(None);

        let result = self.load(client, location).await;
        if let Err(e) = &result {
            self.error.send_replace(Some(e.to_string()));
        }

        self.loading.send_replace(false);
        result
    }

    async fn load(&self, client: &dyn WeatherClient, location: &str) -> Result<(), WeatherError> {
        let snapshot = client.get_current_weather(location).await?;
        let coordinate = snapshot.coordinate;
        self.current.send_replace(Some(snapshot));

        let mut first_error = None;
        match coordinate {
            Some(Coordinate {
                latitude,
                longitude,
            }) => {
                let (hourly, daily, uv_index, aqi) = tokio::join!(
                    client.get_hourly_forecast(location),
                    client.get_daily_forecast(latitude, longitude),
                    client.get_uv_index(latitude, longitude),
                    client.get_aqi(latitude, longitude),
                );
                record(&mut first_error, hourly, |v| {
                    self.hourly.send_replace(v);
                });
                record(&mut first_error, daily, |v| {
                    self.daily.send_replace(v);
                });
                record(&mut first_error, uv_index, |v| {
                    self.uv_index.send_replace(Some(v));
                });
                record(&mut first_error, aqi, |v| {
                    self.aqi.send_replace(Some(v));
                });
            },
            None => {
                warn!(location, "Current weather has no coordinate, skipping daily, UV and AQI");
                let hourly = client.get_hourly_forecast(location).await;
                record(&mut first_error, hourly, |v| {
                    self.hourly.send_replace(v);
                });
            },
        }

        debug!(failed = first_error.is_some(), "Weather state refreshed");
        first_error.map_or(Ok(()), Err)
    }
}
