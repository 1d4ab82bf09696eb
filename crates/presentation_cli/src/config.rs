//! CLI configuration
//!
//! Layered: optional `openweather.toml` (or any format the `config` crate
//! knows), then `OPENWEATHER__*` environment variables, then command-line
//! overrides.

use integration_openweather::{TemperatureUnit, WeatherConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Output defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Temperature unit used when `--unit` is not given
    #[serde(default)]
    pub unit: TemperatureUnit,

    /// Location used when a command is run without one
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_location() -> String {
    "London".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::default(),
            location: default_location(),
        }
    }
}

/// Complete CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Weather service settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Output defaults
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// `file` is passed to `config::File::with_name`, so the extension may be
    /// omitted. Nested keys use a double underscore, e.g.
    /// `OPENWEATHER__WEATHER__CACHE_TTL_SECS=60`.
    pub fn load(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("OPENWEATHER")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Apply an API key given on the command line, if any
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.weather.api_key = Some(SecretString::from(key));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use integration_openweather::DataMode;

    use super::*;

    #[test]
    fn app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.display.unit, TemperatureUnit::Celsius);
        assert_eq!(config.display.location, "London");
        assert_eq!(config.weather.data_mode(), DataMode::Static);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load("/nonexistent/openweather-test-config").expect("loads");
        assert_eq!(config.weather.timeout_secs, 30);
        assert_eq!(config.weather.cache_ttl_secs, 300);
    }

    #[test]
    fn loads_values_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            r#"
[weather]
api_key = "from-file"
cache_ttl_secs = 60

[display]
unit = "fahrenheit"
location = "Paris,FR"
"#
        )
        .expect("write config");

        let path = file.path().to_string_lossy().into_owned();
        let config = AppConfig::load(&path).expect("loads");

        assert_eq!(config.weather.data_mode(), DataMode::Live);
        assert_eq!(config.weather.cache_ttl_secs, 60);
        assert_eq!(config.display.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(config.display.location, "Paris,FR");
    }

    #[test]
    fn command_line_key_overrides_config() {
        let config = AppConfig::default().with_api_key(Some("cli-key".to_string()));
        assert_eq!(config.weather.data_mode(), DataMode::Live);

        let unchanged = AppConfig::default().with_api_key(None);
        assert_eq!(unchanged.weather.data_mode(), DataMode::Static);
    }

    #[test]
    fn blank_command_line_key_keeps_mock_mode() {
        let config = AppConfig::default().with_api_key(Some("  ".to_string()));
        assert_eq!(config.weather.data_mode(), DataMode::Static);
    }
}
