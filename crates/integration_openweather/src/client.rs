//! OpenWeatherMap weather service
//!
//! Public entry point: picks a data source once at construction, then runs
//! every operation through the shared normalization rules.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::cache::{Clock, OneCallCache, SystemClock};
use crate::error::{Operation, WeatherError};
use crate::models::{DailyForecastEntry, HourlyForecastEntry, WeatherSnapshot};
use crate::normalize;
use crate::source::{DataMode, LiveSource, StaticSource, WeatherSource};

/// Weather service configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key; absent or blank selects the bundled dataset
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// API base URL (default: <https://api.openweathermap.org/data/2.5>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// OneCall cache TTL in seconds (default: 300)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

const fn default_timeout() -> u64 {
    30
}

const fn default_cache_ttl() -> u64 {
    300
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}

impl WeatherConfig {
    /// Config with an API key and default endpoints
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Self::default()
        }
    }

    /// The API key, if one is set and not blank
    #[must_use]
    pub fn usable_api_key(&self) -> Option<&SecretString> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }

    /// The data mode this config selects
    #[must_use]
    pub fn data_mode(&self) -> DataMode {
        if self.usable_api_key().is_some() {
            DataMode::Live
        } else {
            DataMode::Static
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Weather operations exposed to callers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current conditions for a location query such as "London,GB"
    async fn get_current_weather(&self, location: &str) -> Result<WeatherSnapshot, WeatherError>;

    /// 5-day forecast in 3-hour steps, in provider order
    async fn get_hourly_forecast(
        &self,
        location: &str,
    ) -> Result<Vec<HourlyForecastEntry>, WeatherError>;

    /// Daily forecast from the (cached) OneCall bundle
    async fn get_daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError>;

    /// Current UV index from the (cached) OneCall bundle
    async fn get_uv_index(&self, latitude: f64, longitude: f64) -> Result<f64, WeatherError>;

    /// Air quality index (1-5), never cached
    async fn get_aqi(&self, latitude: f64, longitude: f64) -> Result<u8, WeatherError>;
}

/// Weather service backed by either the bundled dataset or the live API
pub struct WeatherService {
    source: Arc<dyn WeatherSource>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherService")
            .field("mode", &self.source.mode())
            .field("clock", &self.clock)
            .finish()
    }
}

impl WeatherService {
    /// Build a service on the system clock
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the bundled dataset cannot be
    /// initialized.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a service whose cache expiry and timestamps follow `clock`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the bundled dataset cannot be
    /// initialized.
    pub fn with_clock(config: &WeatherConfig, clock: Arc<dyn Clock>) -> Result<Self, WeatherError> {
        let source: Arc<dyn WeatherSource> = match config.usable_api_key() {
            Some(api_key) => {
                let cache = Arc::new(OneCallCache::new(config.cache_ttl(), Arc::clone(&clock)));
                Arc::new(LiveSource::new(
                    config.base_url.clone(),
                    api_key.clone(),
                    config.timeout(),
                    cache,
                )?)
            },
            None => Arc::new(StaticSource::bundled()?),
        };

        info!(mode = %source.mode(), "Weather data source selected");
        Ok(Self::from_source(source, clock))
    }

    /// Service serving the bundled dataset
    ///
    /// # Errors
    ///
    /// Returns `InvalidFixture` if the bundled dataset cannot be decoded.
    pub fn mock() -> Result<Self, WeatherError> {
        Ok(Self::from_source(
            Arc::new(StaticSource::bundled()?),
            Arc::new(SystemClock),
        ))
    }

    /// Service over an explicit source
    #[must_use]
    pub fn from_source(source: Arc<dyn WeatherSource>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }

    /// Data mode fixed at construction
    #[must_use]
    pub fn mode(&self) -> DataMode {
        self.source.mode()
    }

    /// Log a failed operation once, then hand it back unchanged
    fn report<T>(operation: Operation, result: Result<T, WeatherError>) -> Result<T, WeatherError> {
        result.inspect_err(|e| warn!(operation = %operation, error = %e, "Weather operation failed"))
    }

    async fn current_weather(&self, location: &str) -> Result<WeatherSnapshot, WeatherError> {
        let payload = self.source.current(location).await?;
        normalize::snapshot_from_current(&payload, self.clock.now_millis())
    }

    async fn hourly_forecast(
        &self,
        location: &str,
    ) -> Result<Vec<HourlyForecastEntry>, WeatherError> {
        let payload = self.source.forecast(location).await?;
        normalize::hourly_from_forecast(&payload)
    }

    async fn daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError> {
        let payload = self
            .source
            .one_call(Operation::DailyForecast, latitude, longitude)
            .await?;
        normalize::daily_from_one_call(&payload)
    }

    async fn uv_index(&self, latitude: f64, longitude: f64) -> Result<f64, WeatherError> {
        let payload = self
            .source
            .one_call(Operation::UvIndex, latitude, longitude)
            .await?;
        Ok(normalize::uv_index_from_one_call(&payload))
    }

    async fn aqi(&self, latitude: f64, longitude: f64) -> Result<u8, WeatherError> {
        let payload = self.source.air_pollution(latitude, longitude).await?;
        normalize::aqi_from_air_pollution(&payload)
    }
}

#[async_trait]
impl WeatherClient for WeatherService {
    #[instrument(skip(self))]
    async fn get_current_weather(&self, location: &str) -> Result<WeatherSnapshot, WeatherError> {
        Self::report(Operation::CurrentWeather, self.current_weather(location).await)
    }

    #[instrument(skip(self))]
    async fn get_hourly_forecast(
        &self,
        location: &str,
    ) -> Result<Vec<HourlyForecastEntry>, WeatherError> {
        Self::report(Operation::HourlyForecast, self.hourly_forecast(location).await)
    }

    #[instrument(skip(self))]
    async fn get_daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError> {
        Self::report(
            Operation::DailyForecast,
            self.daily_forecast(latitude, longitude).await,
        )
    }

    #[instrument(skip(self))]
    async fn get_uv_index(&self, latitude: f64, longitude: f64) -> Result<f64, WeatherError> {
        Self::report(Operation::UvIndex, self.uv_index(latitude, longitude).await)
    }

    #[instrument(skip(self))]
    async fn get_aqi(&self, latitude: f64, longitude: f64) -> Result<u8, WeatherError> {
        Self::report(Operation::AirQuality, self.aqi(latitude, longitude).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::payload::{CurrentPayload, OneCallPayload};
    use crate::source::MockWeatherSource;

    fn current_payload() -> CurrentPayload {
        serde_json::from_value(serde_json::json!({
            "coord": { "lat": 40.0, "lon": -74.0 },
            "weather": [{ "description": "clear sky", "icon": "01d" }],
            "main": { "temp": 21.5, "feels_like": 21.0, "humidity": 40 },
            "wind": { "speed": 2.0 }
        }))
        .expect("valid payload")
    }

    fn service(source: MockWeatherSource, now: i64) -> WeatherService {
        WeatherService::from_source(Arc::new(source), Arc::new(ManualClock::new(now)))
    }

    #[test]
    fn test_config_defaults() {
        let config = WeatherConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.data_mode(), DataMode::Static);
    }

    #[test]
    fn test_blank_api_key_selects_static_mode() {
        let config = WeatherConfig::with_api_key("   ");
        assert!(config.usable_api_key().is_none());
        assert_eq!(config.data_mode(), DataMode::Static);
    }

    #[test]
    fn test_api_key_selects_live_mode() {
        let config = WeatherConfig::with_api_key("abc123");
        assert_eq!(config.data_mode(), DataMode::Live);
        let service = WeatherService::new(&config).expect("service builds");
        assert_eq!(service.mode(), DataMode::Live);
    }

    #[test]
    fn test_no_api_key_builds_static_service() {
        let service = WeatherService::new(&WeatherConfig::default()).expect("service builds");
        assert_eq!(service.mode(), DataMode::Static);
        assert_eq!(WeatherService::mock().expect("mock").mode(), DataMode::Static);
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = WeatherConfig::with_api_key("very-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_config_serialization_skips_key() {
        let config = WeatherConfig::with_api_key("very-secret");
        let json = serde_json::to_string(&config).expect("should serialize");
        assert!(!json.contains("very-secret"));

        let deserialized: WeatherConfig =
            serde_json::from_str(r#"{"api_key": "k", "cache_ttl_secs": 60}"#)
                .expect("should deserialize");
        assert_eq!(deserialized.data_mode(), DataMode::Live);
        assert_eq!(deserialized.cache_ttl_secs, 60);
        assert_eq!(deserialized.timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_current_weather_stamped_with_clock() {
        let mut source = MockWeatherSource::new();
        source.expect_mode().return_const(DataMode::Live);
        source
            .expect_current()
            .withf(|location| location == "New York")
            .times(1)
            .returning(|_| Ok(current_payload()));

        let snapshot = service(source, 1_234_567)
            .get_current_weather("New York")
            .await
            .expect("succeeds");
        assert_eq!(snapshot.timestamp, 1_234_567);
        assert!((snapshot.temperature - 21.5).abs() < f64::EPSILON);
        assert_eq!(snapshot.humidity, 40);
    }

    #[tokio::test]
    async fn test_upstream_error_is_returned_unchanged() {
        let mut source = MockWeatherSource::new();
        source.expect_mode().return_const(DataMode::Live);
        source.expect_current().times(1).returning(|_| {
            Err(WeatherError::Upstream {
                operation: Operation::CurrentWeather,
                status: Some(404),
                reason: "HTTP 404 Not Found".to_string(),
            })
        });

        let err = service(source, 0)
            .get_current_weather("Atlantis")
            .await
            .expect_err("fails");
        assert!(matches!(
            err,
            WeatherError::Upstream {
                operation: Operation::CurrentWeather,
                status: Some(404),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_daily_and_uv_label_one_call_with_their_operation() {
        let mut source = MockWeatherSource::new();
        source.expect_mode().return_const(DataMode::Live);
        source
            .expect_one_call()
            .withf(|op, lat, lon| {
                *op == Operation::DailyForecast
                    && (*lat - 40.0).abs() < f64::EPSILON
                    && (*lon + 74.0).abs() < f64::EPSILON
            })
            .times(1)
            .returning(|_, _, _| {
                let payload: OneCallPayload =
                    serde_json::from_str(r#"{"current": {"uvi": 3.5}}"#).expect("valid");
                Ok(Arc::new(payload))
            });
        source
            .expect_one_call()
            .withf(|op, _, _| *op == Operation::UvIndex)
            .times(1)
            .returning(|_, _, _| {
                let payload: OneCallPayload =
                    serde_json::from_str(r#"{"current": {"uvi": 3.5}}"#).expect("valid");
                Ok(Arc::new(payload))
            });

        let service = service(source, 0);
        let daily = service.get_daily_forecast(40.0, -74.0).await.expect("daily");
        assert!(daily.is_empty());
        let uv = service.get_uv_index(40.0, -74.0).await.expect("uv");
        assert!((uv - 3.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_mock_mode_serves_bundled_current_weather() {
        let service = WeatherService::mock().expect("mock");
        let snapshot = service.get_current_weather("anywhere").await.expect("static");
        assert!((snapshot.temperature - 15.0).abs() < f64::EPSILON);
        assert_eq!(snapshot.humidity, 80);
        assert!(snapshot.coordinate.is_some());
    }

    #[tokio::test]
    async fn test_mock_mode_serves_every_operation() {
        let service = WeatherService::mock().expect("mock");
        let hourly = service.get_hourly_forecast("anywhere").await.expect("hourly");
        assert_eq!(hourly.len(), 8);
        assert!((hourly[1].precipitation_probability - 42.0).abs() < 1e-9);
        assert!((hourly[1].rain - 1.2).abs() < f64::EPSILON);
        assert!(hourly[0].rain.abs() < f64::EPSILON);

        let daily = service.get_daily_forecast(0.0, 0.0).await.expect("daily");
        assert_eq!(daily.len(), 5);
        assert!(daily[1].rain.abs() < f64::EPSILON);

        let uv = service.get_uv_index(0.0, 0.0).await.expect("uv");
        assert!((uv - 4.21).abs() < f64::EPSILON);

        assert_eq!(service.get_aqi(0.0, 0.0).await.expect("aqi"), 2);
    }
}
