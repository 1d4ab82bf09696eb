//! OpenWeatherMap CLI
//!
//! Command-line front end for the weather data-access layer.

#![allow(clippy::print_stdout)]

use clap::Parser;
use integration_openweather::WeatherService;
use presentation_cli::{AppConfig, Cli, OutputOptions, execute, log_filter_from_verbosity};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Logs go to stderr so stdout stays clean for `--json`
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let app_config = AppConfig::load(&cli.config)
        .map_err(|e| anyhow::anyhow!("Failed to load config '{}': {e}", cli.config))?
        .with_api_key(cli.api_key.clone());
    debug!(config = ?app_config, "Configuration loaded");

    let service = WeatherService::new(&app_config.weather)
        .map_err(|e| anyhow::anyhow!("Failed to initialize weather service: {e}"))?;
    info!(mode = %service.mode(), "Weather service ready");

    let options = OutputOptions {
        unit: cli.unit.unwrap_or(app_config.display.unit),
        json: cli.json,
        default_location: app_config.display.location.clone(),
    };

    let output = execute(&cli.command, &service, &options).await?;
    print!("{output}");

    Ok(())
}
