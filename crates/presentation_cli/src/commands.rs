//! Command execution
//!
//! Runs a parsed subcommand against any `WeatherClient` and returns the text
//! to print, so the binary stays a thin wrapper.

use integration_openweather::{TemperatureUnit, WeatherClient, WeatherState};
use serde::Serialize;
use tracing::warn;

use crate::cli::Commands;
use crate::render::{self, DashboardView};

/// How results are presented
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub unit: TemperatureUnit,
    pub json: bool,
    /// Location used when a command does not name one
    pub default_location: String,
}

impl OutputOptions {
    fn location(&self, requested: Option<&String>) -> String {
        requested.map_or_else(|| self.default_location.clone(), Clone::clone)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

/// Execute `command` and return its output
pub async fn execute(
    command: &Commands,
    client: &dyn WeatherClient,
    options: &OutputOptions,
) -> anyhow::Result<String> {
    match command {
        Commands::Current { location } => {
            let snapshot = client
                .get_current_weather(&options.location(location.as_ref()))
                .await?;
            if options.json {
                to_json(&snapshot)
            } else {
                Ok(render::current(&snapshot, options.unit))
            }
        },

        Commands::Hourly { location, limit } => {
            let mut entries = client
                .get_hourly_forecast(&options.location(location.as_ref()))
                .await?;
            if let Some(limit) = limit {
                entries.truncate(*limit);
            }
            if options.json {
                to_json(&entries)
            } else {
                Ok(render::hourly(&entries, options.unit))
            }
        },

        Commands::Daily { coordinate } => {
            let entries = client
                .get_daily_forecast(coordinate.lat, coordinate.lon)
                .await?;
            if options.json {
                to_json(&entries)
            } else {
                Ok(render::daily(&entries, options.unit))
            }
        },

        Commands::Uv { coordinate } => {
            let uv_index = client.get_uv_index(coordinate.lat, coordinate.lon).await?;
            if options.json {
                to_json(&serde_json::json!({
                    "uv_index": uv_index,
                    "category": render::uv_category(uv_index),
                }))
            } else {
                Ok(render::uv(uv_index))
            }
        },

        Commands::Aqi { coordinate } => {
            let aqi = client.get_aqi(coordinate.lat, coordinate.lon).await?;
            if options.json {
                to_json(&serde_json::json!({
                    "aqi": aqi,
                    "label": render::aqi_label(aqi),
                }))
            } else {
                Ok(render::aqi(aqi))
            }
        },

        Commands::Dashboard { location } => {
            let location = options.location(location.as_ref());
            let view = load_dashboard(client, &location, options.unit).await?;
            if options.json {
                to_json(&view)
            } else {
                Ok(render::dashboard(&view))
            }
        },
    }
}

/// Refresh a `WeatherState` and collect its containers
///
/// Partial failures are reported inside the view. Only a failed current
/// weather fetch, which leaves nothing to show, is returned as an error.
async fn load_dashboard(
    client: &dyn WeatherClient,
    location: &str,
    unit: TemperatureUnit,
) -> anyhow::Result<DashboardView> {
    let state = WeatherState::new();
    state.set_unit(unit);

    if let Err(e) = state.refresh(client, location).await {
        if state.current().is_none() {
            return Err(e.into());
        }
        warn!(location, "Dashboard loaded with missing sections");
    }

    Ok(DashboardView {
        location: location.to_string(),
        unit: state.unit(),
        current: state.current(),
        hourly: state.hourly(),
        daily: state.daily(),
        uv_index: state.uv_index(),
        aqi: state.aqi(),
        error: state.error(),
    })
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use integration_openweather::{
        Coordinate, DailyForecastEntry, HourlyForecastEntry, Operation, WeatherError,
        WeatherSnapshot,
    };

    use super::*;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Everything succeeds except air quality
    struct AqiDownClient;

    #[async_trait]
    impl WeatherClient for AqiDownClient {
        async fn get_current_weather(
            &self,
            _location: &str,
        ) -> Result<WeatherSnapshot, WeatherError> {
            Ok(WeatherSnapshot {
                temperature: 4.0,
                feels_like: 1.5,
                humidity: 90,
                wind_speed: 6.2,
                description: "light snow".to_string(),
                icon: "13d".to_string(),
                timestamp: 0,
                coordinate: Some(Coordinate::new(59.91, 10.75)),
            })
        }

        async fn get_hourly_forecast(
            &self,
            _location: &str,
        ) -> Result<Vec<HourlyForecastEntry>, WeatherError> {
            Ok(Vec::new())
        }

        async fn get_daily_forecast(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<Vec<DailyForecastEntry>, WeatherError> {
            Ok(Vec::new())
        }

        async fn get_uv_index(&self, _latitude: f64, _longitude: f64) -> Result<f64, WeatherError> {
            Ok(1.0)
        }

        async fn get_aqi(&self, _latitude: f64, _longitude: f64) -> Result<u8, WeatherError> {
            Err(WeatherError::Upstream {
                operation: Operation::AirQuality,
                status: Some(500),
                reason: "pollution backend unavailable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn partial_dashboard_does_not_log_the_error_again() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let view = load_dashboard(&AqiDownClient, "Oslo", TemperatureUnit::Celsius)
            .await
            .expect("partial view");

        assert!(view.current.is_some());
        assert_eq!(view.uv_index, Some(1.0));
        assert!(view.aqi.is_none());
        assert!(
            view.error
                .as_deref()
                .is_some_and(|e| e.contains("pollution backend unavailable"))
        );

        let logged = logs.contents();
        assert!(logged.contains("Dashboard loaded with missing sections"));
        assert!(!logged.contains("pollution backend unavailable"));
    }
}
