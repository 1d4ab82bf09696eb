//! Temperature unit helpers
//!
//! Entities always carry Celsius; conversion happens only for display.

use serde::{Deserialize, Serialize};

/// Display unit for temperatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// The other unit
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

impl std::str::FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(Self::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(Self::Fahrenheit),
            _ => Err(format!(
                "Invalid temperature unit: {s}. Use 'celsius' or 'fahrenheit'"
            )),
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Celsius => write!(f, "celsius"),
            Self::Fahrenheit => write!(f, "fahrenheit"),
        }
    }
}

#[must_use]
pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius.mul_add(9.0 / 5.0, 32.0)
}

#[must_use]
pub fn to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * (5.0 / 9.0)
}

/// Express a Celsius value in `unit`
#[must_use]
pub fn convert(celsius: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => to_fahrenheit(celsius),
    }
}

/// Format a Celsius value rounded to whole degrees in `unit`, e.g. "59°F"
#[must_use]
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    // Adding +0.0 turns a rounded -0.0 into 0.0, so no "-0°C"
    let rounded = convert(celsius, unit).round() + 0.0;
    format!("{rounded:.0}{}", unit.symbol())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freezing_and_boiling_points() {
        assert!((to_fahrenheit(0.0) - 32.0).abs() < 1e-9);
        assert!((to_fahrenheit(100.0) - 212.0).abs() < 1e-9);
        assert!((to_celsius(32.0)).abs() < 1e-9);
        assert!((to_celsius(-40.0) + 40.0).abs() < 1e-9);
    }

    #[test]
    fn round_trip_holds_for_huge_values() {
        for x in [f64::MAX / 2.0, -f64::MAX / 2.0, 1e300, -1e300] {
            let back = to_fahrenheit(to_celsius(x));
            assert!(back.is_finite(), "{x} became {back}");
            assert!((back - x).abs() <= x.abs() * 1e-12);
        }
    }

    #[test]
    fn format_rounds_to_whole_degrees() {
        assert_eq!(format_temperature(15.0, TemperatureUnit::Celsius), "15°C");
        assert_eq!(format_temperature(15.0, TemperatureUnit::Fahrenheit), "59°F");
        assert_eq!(format_temperature(21.6, TemperatureUnit::Celsius), "22°C");
        assert_eq!(format_temperature(-0.2, TemperatureUnit::Celsius), "0°C");
        assert_eq!(format_temperature(-12.7, TemperatureUnit::Celsius), "-13°C");
    }

    #[test]
    fn toggle_flips_between_units() {
        assert_eq!(TemperatureUnit::Celsius.toggled(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::Fahrenheit.toggled(), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::default(), TemperatureUnit::Celsius);
    }

    #[test]
    fn parse_unit_names() {
        assert_eq!("F".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Fahrenheit));
        assert_eq!("Celsius".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Celsius));
        assert_eq!("metric".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Celsius));
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
    }

    #[test]
    fn unit_display_round_trips_through_from_str() {
        for unit in [TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit] {
            assert_eq!(unit.to_string().parse::<TemperatureUnit>(), Ok(unit));
        }
    }
}
