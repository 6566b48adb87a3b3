//! Core library for the `skycast` terminal weather app.
//!
//! This crate defines:
//! - Configuration loaded from the environment
//! - The OpenWeatherMap client with typed fault classification
//! - Shared domain models (snapshots, daily forecasts)
//! - Aggregation of 3-hour forecast samples into daily summaries
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use aggregate::aggregate_daily;
pub use client::{MAX_FORECAST_DAYS, OpenWeatherClient};
pub use config::Config;
pub use error::WeatherError;
pub use model::{Condition, ForecastDay, ForecastSample, Units, WeatherSnapshot};
