//! Data sources
//!
//! A `WeatherSource` hands back decoded provider payloads. `StaticSource`
//! serves the bundled sample dataset, `LiveSource` talks to OpenWeatherMap
//! and keeps OneCall bundles in a [`OneCallCache`]. Which one backs a
//! service is decided once, when the service is built.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::cache::OneCallCache;
use crate::error::{Operation, WeatherError};
use crate::payload::{
    AirPollutionPayload, CurrentPayload, ForecastPayload, MockDataset, OneCallPayload,
};

const BUNDLED_DATASET: &str = include_str!("../fixtures/sample_weather.json");

/// Sections excluded from OneCall requests
const ONE_CALL_EXCLUDE: &str = "minutely,alerts";

/// Where a service gets its data from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    /// Bundled sample dataset, no network
    Static,
    /// OpenWeatherMap over HTTP
    Live,
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// Provider of raw weather payloads
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Which kind of source this is
    fn mode(&self) -> DataMode;

    /// Current conditions for a named location (`/weather`)
    async fn current(&self, location: &str) -> Result<CurrentPayload, WeatherError>;

    /// 5-day / 3-hour forecast for a named location (`/forecast`)
    async fn forecast(&self, location: &str) -> Result<ForecastPayload, WeatherError>;

    /// OneCall bundle for a coordinate pair; `operation` labels failures
    async fn one_call(
        &self,
        operation: Operation,
        latitude: f64,
        longitude: f64,
    ) -> Result<Arc<OneCallPayload>, WeatherError>;

    /// Air pollution samples for a coordinate pair (`/air_pollution`)
    async fn air_pollution(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirPollutionPayload, WeatherError>;
}

/// Serves the bundled sample dataset
#[derive(Debug, Clone)]
pub struct StaticSource {
    dataset: MockDataset,
    one_call: Arc<OneCallPayload>,
}

impl StaticSource {
    /// Load the dataset compiled into the crate
    ///
    /// # Errors
    ///
    /// Returns `InvalidFixture` if the bundled JSON does not decode.
    pub fn bundled() -> Result<Self, WeatherError> {
        Self::from_json(BUNDLED_DATASET)
    }

    /// Load a dataset shaped like the bundled one
    ///
    /// # Errors
    ///
    /// Returns `InvalidFixture` if `json` does not decode.
    pub fn from_json(json: &str) -> Result<Self, WeatherError> {
        let dataset: MockDataset =
            serde_json::from_str(json).map_err(|e| WeatherError::InvalidFixture(e.to_string()))?;
        let one_call = Arc::new(dataset.onecall.clone());
        Ok(Self { dataset, one_call })
    }
}

#[async_trait]
impl WeatherSource for StaticSource {
    fn mode(&self) -> DataMode {
        DataMode::Static
    }

    async fn current(&self, location: &str) -> Result<CurrentPayload, WeatherError> {
        debug!(location, "Serving current weather from sample dataset");
        Ok(self.dataset.current.clone())
    }

    async fn forecast(&self, location: &str) -> Result<ForecastPayload, WeatherError> {
        debug!(location, "Serving forecast from sample dataset");
        Ok(self.dataset.forecast.clone())
    }

    async fn one_call(
        &self,
        _operation: Operation,
        latitude: f64,
        longitude: f64,
    ) -> Result<Arc<OneCallPayload>, WeatherError> {
        debug!(latitude, longitude, "Serving OneCall bundle from sample dataset");
        Ok(Arc::clone(&self.one_call))
    }

    async fn air_pollution(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirPollutionPayload, WeatherError> {
        debug!(latitude, longitude, "Serving air pollution from sample dataset");
        Ok(self.dataset.air_pollution.clone())
    }
}

/// OpenWeatherMap HTTP source
pub struct LiveSource {
    client: Client,
    base_url: String,
    api_key: SecretString,
    cache: Arc<OneCallCache>,
}

impl fmt::Debug for LiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSource")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("cache", &self.cache)
            .finish()
    }
}

impl LiveSource {
    /// Create a live source sharing the given OneCall cache
    ///
    /// # Errors
    ///
    /// Returns `ClientInit` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
        cache: Arc<OneCallCache>,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::ClientInit(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            cache,
        })
    }

    /// GET `{base_url}/{endpoint}` and decode the body
    ///
    /// The API key is appended last and never logged.
    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(url = %url, ?query, "Requesting provider endpoint");

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.expose_secret())])
            .send()
            .await
            .map_err(|e| WeatherError::transport(operation, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::upstream_status(operation, status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::transport(operation, &e))?;

        serde_json::from_str(&body).map_err(|e| WeatherError::normalization(operation, e.to_string()))
    }

    fn coordinate_query(latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        vec![("lat", latitude.to_string()), ("lon", longitude.to_string())]
    }
}

#[async_trait]
impl WeatherSource for LiveSource {
    fn mode(&self) -> DataMode {
        DataMode::Live
    }

    #[instrument(skip(self))]
    async fn current(&self, location: &str) -> Result<CurrentPayload, WeatherError> {
        let query = [("q", location.to_string()), ("units", "metric".to_string())];
        self.get_json(Operation::CurrentWeather, "weather", &query).await
    }

    #[instrument(skip(self))]
    async fn forecast(&self, location: &str) -> Result<ForecastPayload, WeatherError> {
        let query = [("q", location.to_string()), ("units", "metric".to_string())];
        self.get_json(Operation::HourlyForecast, "forecast", &query).await
    }

    #[instrument(skip(self))]
    async fn one_call(
        &self,
        operation: Operation,
        latitude: f64,
        longitude: f64,
    ) -> Result<Arc<OneCallPayload>, WeatherError> {
        if let Some(payload) = self.cache.get(latitude, longitude) {
            return Ok(payload);
        }

        // Misses are not coalesced: concurrent callers may each fetch.
        let mut query = Self::coordinate_query(latitude, longitude);
        query.push(("exclude", ONE_CALL_EXCLUDE.to_string()));
        query.push(("units", "metric".to_string()));

        let payload: OneCallPayload = self.get_json(operation, "onecall", &query).await?;
        let payload = Arc::new(payload);
        self.cache.insert(latitude, longitude, Arc::clone(&payload));
        Ok(payload)
    }

    #[instrument(skip(self))]
    async fn air_pollution(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirPollutionPayload, WeatherError> {
        let query = Self::coordinate_query(latitude, longitude);
        self.get_json(Operation::AirQuality, "air_pollution", &query).await
    }
}
