//! OpenWeatherMap CLI
//!
//! Argument parsing, layered configuration and text rendering for the
//! `openweather-cli` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

pub use cli::{Cli, Commands, CoordinateArgs, log_filter_from_verbosity};
pub use commands::{OutputOptions, execute};
pub use config::{AppConfig, DisplayConfig};
