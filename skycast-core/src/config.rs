use anyhow::{Result, anyhow};
use std::env;

use crate::model::Units;

const DEFAULT_CITY: &str = "London";

/// Application configuration, supplied through the environment.
///
/// Reads `OPENWEATHER_API_KEY` (required), `DEFAULT_CITY` and
/// `TEMPERATURE_UNIT` (both optional). A `.env` file next to the binary is
/// honored when present.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub default_city: String,
    pub units: Units,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A missing or blank API key is the only fatal startup condition.
    pub fn from_env() -> Result<Self> {
        // Best-effort: absence of a .env file is not an error.
        dotenvy::dotenv().ok();

        Self::build(
            env::var("OPENWEATHER_API_KEY").ok(),
            env::var("DEFAULT_CITY").ok(),
            env::var("TEMPERATURE_UNIT").ok(),
        )
    }

    fn build(
        api_key: Option<String>,
        default_city: Option<String>,
        unit_label: Option<String>,
    ) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "API key not found. Please set OPENWEATHER_API_KEY in the environment or a .env file."
                )
            })?;

        let default_city = default_city
            .map(|city| city.trim().to_string())
            .filter(|city| !city.is_empty())
            .unwrap_or_else(|| DEFAULT_CITY.to_string());

        let units = match unit_label {
            Some(label) => Units::try_from(label.as_str())?,
            None => Units::Metric,
        };

        Ok(Self { api_key, default_city, units })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_without_api_key() {
        let err = Config::build(None, None, None).unwrap_err();
        assert!(err.to_string().contains("OPENWEATHER_API_KEY"));
    }

    #[test]
    fn build_errors_on_blank_api_key() {
        let err = Config::build(Some("   ".to_string()), None, None).unwrap_err();
        assert!(err.to_string().contains("API key not found"));
    }

    #[test]
    fn build_falls_back_to_defaults() {
        let cfg = Config::build(Some("KEY".to_string()), None, None).unwrap();

        assert_eq!(cfg.api_key, "KEY");
        assert_eq!(cfg.default_city, "London");
        assert_eq!(cfg.units, Units::Metric);
    }

    #[test]
    fn build_honors_explicit_settings() {
        let cfg = Config::build(
            Some("KEY".to_string()),
            Some(" Kyiv ".to_string()),
            Some("fahrenheit".to_string()),
        )
        .unwrap();

        assert_eq!(cfg.default_city, "Kyiv");
        assert_eq!(cfg.units, Units::Imperial);
    }

    #[test]
    fn build_rejects_unknown_unit_label() {
        let err = Config::build(Some("KEY".to_string()), None, Some("kelvin".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("Unknown temperature unit"));
    }
}
