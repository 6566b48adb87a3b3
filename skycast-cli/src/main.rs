//! Binary crate for the `skycast` terminal weather app.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive menu loop and session state
//! - Human-friendly output formatting

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use skycast_core::{Config, OpenWeatherClient, Units};

mod app;
mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Diagnostics go to stderr so they never interleave with the UI.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // A missing API key is the only fatal startup condition.
    let config = Config::from_env().context("Failed to load configuration")?;

    let units = match &args.units {
        Some(label) => Units::try_from(label.as_str())?,
        None => config.units,
    };
    let city = args.city.unwrap_or(config.default_city);

    let client = OpenWeatherClient::new(config.api_key)?;

    app::Session::new(client, city, units).run().await
}
