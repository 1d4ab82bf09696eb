//! Provider payload schemas
//!
//! Typed mirrors of the OpenWeatherMap 2.5 response bodies. Decoding into
//! these structs is the validation step: fields the normalizer cannot do
//! without are plain values, everything with a documented default is an
//! `Option` (missing and `null` both decode to `None`).

use serde::Deserialize;

/// Body of `GET /weather`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPayload {
    #[serde(default)]
    pub coord: Option<CoordPayload>,
    #[serde(default)]
    pub weather: Vec<ConditionPayload>,
    pub main: MainPayload,
    #[serde(default)]
    pub wind: Option<WindPayload>,
}

/// Body of `GET /forecast` (5 days, 3-hour steps)
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub list: Vec<ForecastItemPayload>,
}

/// One entry of `forecast.list`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastItemPayload {
    /// Forecast time, unix seconds
    pub dt: i64,
    pub main: MainPayload,
    #[serde(default)]
    pub weather: Vec<ConditionPayload>,
    /// Probability of precipitation as a 0-1 fraction
    pub pop: Option<f64>,
    pub rain: Option<VolumePayload>,
    pub snow: Option<VolumePayload>,
}

/// Body of `GET /onecall`
#[derive(Debug, Clone, Deserialize)]
pub struct OneCallPayload {
    pub current: Option<OneCallCurrentPayload>,
    pub daily: Option<Vec<DailyPayload>>,
}

/// `onecall.current`, reduced to what the normalizer reads
#[derive(Debug, Clone, Deserialize)]
pub struct OneCallCurrentPayload {
    pub uvi: Option<f64>,
}

/// One entry of `onecall.daily`
#[derive(Debug, Clone, Deserialize)]
pub struct DailyPayload {
    /// Day, unix seconds
    pub dt: i64,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub temp: DailyTemperaturePayload,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_deg: Option<f64>,
    #[serde(default)]
    pub weather: Vec<ConditionPayload>,
    pub pop: Option<f64>,
    /// Daily rain volume in mm (a scalar here, unlike the forecast list)
    pub rain: Option<f64>,
    pub snow: Option<f64>,
    pub uvi: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyTemperaturePayload {
    pub min: f64,
    pub max: f64,
    pub day: f64,
    pub night: f64,
}

/// Body of `GET /air_pollution`
#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionPayload {
    pub list: Vec<PollutionItemPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollutionItemPayload {
    pub main: PollutionIndexPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollutionIndexPayload {
    /// Air quality index, 1 (good) to 5 (very poor)
    pub aqi: u8,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CoordPayload {
    pub lat: f64,
    pub lon: f64,
}

/// Entry of a `weather` array
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionPayload {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainPayload {
    pub temp: f64,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindPayload {
    pub speed: Option<f64>,
}

/// Precipitation volume keyed by accumulation window
#[derive(Debug, Clone, Deserialize)]
pub struct VolumePayload {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

/// The bundled mock dataset, shaped like the four provider bodies
#[derive(Debug, Clone, Deserialize)]
pub struct MockDataset {
    pub current: CurrentPayload,
    pub forecast: ForecastPayload,
    pub onecall: OneCallPayload,
    pub air_pollution: AirPollutionPayload,
}
