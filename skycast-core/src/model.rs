use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Unit system used for provider requests and display.
///
/// Records are always built for one unit system; switching units means
/// re-fetching, not converting in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    /// Value of the provider's `units` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temp_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    /// Wind speed label matching what the provider returns per unit system.
    pub fn wind_label(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Units::Metric => Units::Imperial,
            Units::Imperial => Units::Metric,
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Units::Metric => "Celsius (°C)",
            Units::Imperial => "Fahrenheit (°F)",
        };
        f.write_str(label)
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "celsius" | "metric" => Ok(Units::Metric),
            "fahrenheit" | "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported values: celsius, fahrenheit."
            )),
        }
    }
}

/// Point-in-time weather for one city, in the unit system it was fetched with.
///
/// `temp_min <= temperature <= temp_max` is not guaranteed by the provider
/// (the min/max describe the wider area) and must not be assumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    /// Degrees, 0 when the provider omits it.
    pub wind_direction: i32,
    /// Condition group, e.g. "Rain".
    pub condition: String,
    /// Human description, title-cased.
    pub description: String,
    pub icon: String,
    pub clouds: u8,
    pub visibility_km: f64,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// City UTC offset in seconds.
    pub timezone_offset: i32,
    /// When this snapshot was processed, not the provider's observation time.
    pub fetched_at: DateTime<Utc>,
}

/// One day of aggregated forecast. `temp_min <= temp_avg <= temp_max` holds
/// by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
    pub temp_avg: f64,
    /// Dominant condition group for the day.
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// One 3-hour forecast point as fed into the daily aggregation.
#[derive(Debug, Clone)]
pub struct ForecastSample {
    /// Epoch seconds.
    pub timestamp: i64,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, Default)]
pub struct Condition {
    pub group: String,
    pub description: String,
    pub icon: String,
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Capitalize the first letter of each word, lowercase the rest.
pub(crate) fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_query_values() {
        assert_eq!(Units::Metric.as_query(), "metric");
        assert_eq!(Units::Imperial.as_query(), "imperial");
    }

    #[test]
    fn units_parse_both_vocabularies() {
        assert_eq!(Units::try_from("celsius").unwrap(), Units::Metric);
        assert_eq!(Units::try_from("Metric").unwrap(), Units::Metric);
        assert_eq!(Units::try_from("FAHRENHEIT").unwrap(), Units::Imperial);
        assert_eq!(Units::try_from(" imperial ").unwrap(), Units::Imperial);
    }

    #[test]
    fn units_parse_rejects_unknown_label() {
        let err = Units::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown temperature unit"));
    }

    #[test]
    fn units_toggle_flips_both_ways() {
        assert_eq!(Units::Metric.toggled(), Units::Imperial);
        assert_eq!(Units::Imperial.toggled(), Units::Metric);
    }

    #[test]
    fn round1_one_decimal() {
        assert_eq!(round1(11.27), 11.3);
        assert_eq!(round1(-3.14), -3.1);
        assert_eq!(round1(10.0), 10.0);
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("OVERCAST clouds"), "Overcast Clouds");
        assert_eq!(title_case(""), "");
    }
}
