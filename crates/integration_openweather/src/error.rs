//! Weather layer errors

use std::fmt;

use thiserror::Error;

/// Public operation a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CurrentWeather,
    HourlyForecast,
    DailyForecast,
    UvIndex,
    AirQuality,
}

impl Operation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentWeather => "current_weather",
            Self::HourlyForecast => "hourly_forecast",
            Self::DailyForecast => "daily_forecast",
            Self::UvIndex => "uv_index",
            Self::AirQuality => "air_quality",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weather layer errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Non-success HTTP status or transport failure on a live call
    #[error("{operation}: upstream request failed: {reason}")]
    Upstream {
        operation: Operation,
        /// HTTP status, absent for transport-level failures
        status: Option<u16>,
        reason: String,
    },

    /// Provider payload did not match the expected schema
    #[error("{operation}: could not normalize provider payload: {reason}")]
    Normalization { operation: Operation, reason: String },

    /// The HTTP client could not be built
    #[error("HTTP client initialization failed: {0}")]
    ClientInit(String),

    /// The bundled sample dataset could not be decoded
    #[error("Invalid mock dataset: {0}")]
    InvalidFixture(String),
}

impl WeatherError {
    pub(crate) fn upstream_status(operation: Operation, status: reqwest::StatusCode) -> Self {
        Self::Upstream {
            operation,
            status: Some(status.as_u16()),
            reason: format!("HTTP {status}"),
        }
    }

    pub(crate) fn transport(operation: Operation, err: &reqwest::Error) -> Self {
        Self::Upstream {
            operation,
            status: None,
            reason: err.to_string(),
        }
    }

    pub(crate) fn normalization(operation: Operation, reason: impl Into<String>) -> Self {
        Self::Normalization {
            operation,
            reason: reason.into(),
        }
    }

    /// Operation the error belongs to, if it came from one
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Upstream { operation, .. } | Self::Normalization { operation, .. } => {
                Some(*operation)
            },
            Self::ClientInit(_) | Self::InvalidFixture(_) => None,
        }
    }

    /// True for `Upstream` errors
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}
