//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use integration_openweather::TemperatureUnit;

/// OpenWeatherMap CLI
#[derive(Debug, Parser)]
#[command(name = "openweather-cli")]
#[command(author, version, about = "OpenWeatherMap weather CLI", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// OpenWeatherMap API key; without one the bundled sample data is served
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Config file name, extension optional (missing file is fine)
    #[arg(long, default_value = "openweather", global = true)]
    pub config: String,

    /// Display unit: celsius or fahrenheit (default from config)
    #[arg(short, long, global = true)]
    pub unit: Option<TemperatureUnit>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Coordinate pair for the OneCall and air pollution operations
#[derive(Debug, Clone, Copy, Args)]
pub struct CoordinateArgs {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show current conditions
    ///
    /// Example: openweather-cli current "London,GB"
    Current {
        /// Location query (default from config)
        location: Option<String>,
    },

    /// Show the 5-day forecast in 3-hour steps
    Hourly {
        /// Location query (default from config)
        location: Option<String>,

        /// Only show the first N entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the daily forecast for a coordinate pair
    ///
    /// Example: openweather-cli daily --lat 40.71 --lon -74.01
    Daily {
        #[command(flatten)]
        coordinate: CoordinateArgs,
    },

    /// Show the current UV index for a coordinate pair
    Uv {
        #[command(flatten)]
        coordinate: CoordinateArgs,
    },

    /// Show the air quality index for a coordinate pair
    Aqi {
        #[command(flatten)]
        coordinate: CoordinateArgs,
    },

    /// Load everything for a location and print it in one view
    Dashboard {
        /// Location query (default from config)
        location: Option<String>,
    },
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
