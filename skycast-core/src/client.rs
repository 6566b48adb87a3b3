use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    aggregate::aggregate_daily,
    error::WeatherError,
    model::{Condition, ForecastDay, ForecastSample, Units, WeatherSnapshot, round1, title_case},
};

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Forecast horizon of the provider's free tier.
pub const MAX_FORECAST_DAYS: usize = 5;
/// The forecast endpoint returns samples at 3-hour intervals.
const SAMPLES_PER_DAY: usize = 8;
const MAX_SAMPLES: usize = 40;

/// Client for the OpenWeatherMap API.
///
/// Holds only the credential and a reusable connection pool; no session
/// state survives between calls.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { api_key, http })
    }

    /// Fetch current weather for a city.
    pub async fn fetch_current(
        &self,
        city: &str,
        units: Units,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let city = validate_city(city)?;
        tracing::debug!(city, units = units.as_query(), "requesting current weather");

        let url = format!("{BASE_URL}/weather");
        let body = self
            .get_checked(&url, &[("q", city), ("units", units.as_query())], city)
            .await?;

        let parsed: OwCurrent =
            serde_json::from_str(&body).context("Failed to parse current weather JSON")?;

        Ok(map_current(parsed))
    }

    /// Fetch a forecast for a city, aggregated into at most `days` daily
    /// summaries. `days` is clamped to the provider's 1..=5 range.
    pub async fn fetch_forecast(
        &self,
        city: &str,
        units: Units,
        days: usize,
    ) -> Result<Vec<ForecastDay>, WeatherError> {
        let city = validate_city(city)?;
        let days = days.clamp(1, MAX_FORECAST_DAYS);
        let cnt = (days * SAMPLES_PER_DAY).min(MAX_SAMPLES).to_string();
        tracing::debug!(city, units = units.as_query(), days, "requesting forecast");

        let url = format!("{BASE_URL}/forecast");
        let body = self
            .get_checked(
                &url,
                &[("q", city), ("units", units.as_query()), ("cnt", cnt.as_str())],
                city,
            )
            .await?;

        let parsed: OwForecast =
            serde_json::from_str(&body).context("Failed to parse forecast JSON")?;

        let tz_offset = parsed.city.timezone;
        let samples: Vec<ForecastSample> = parsed.list.into_iter().map(map_sample).collect();

        Ok(aggregate_daily(&samples, tz_offset, days))
    }

    /// Issue a GET with the credential attached and classify the outcome.
    /// Returns the response body only for success statuses.
    async fn get_checked(
        &self,
        url: &str,
        query: &[(&str, &str)],
        city: &str,
    ) -> Result<String, WeatherError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(classify_transport)?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(classify_transport)?;

        match classify_status(status, city, &body) {
            Some(fault) => {
                tracing::debug!(status, city, "provider call failed");
                Err(fault)
            }
            None => Ok(body),
        }
    }
}

fn validate_city(city: &str) -> Result<&str, WeatherError> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::Unexpected(anyhow!("City name cannot be empty")));
    }
    Ok(trimmed)
}

fn classify_transport(err: reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        WeatherError::Timeout
    } else if err.is_connect() {
        WeatherError::ConnectionFailure
    } else {
        WeatherError::Unexpected(err.into())
    }
}

/// Map a provider status to a fault; `None` means success. 404 and 401 take
/// priority over the generic non-success case, and the error body is not
/// assumed to be JSON.
fn classify_status(status: u16, city: &str, body: &str) -> Option<WeatherError> {
    match status {
        404 => Some(WeatherError::NotFound { city: city.to_string() }),
        401 => Some(WeatherError::Unauthorized),
        200..=299 => None,
        _ => Some(WeatherError::Provider { status, body: truncate_body(body) }),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        // Error bodies are arbitrary text; back off to a char boundary so
        // multi-byte characters never split.
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

fn map_current(raw: OwCurrent) -> WeatherSnapshot {
    let condition = raw.weather.into_iter().next().unwrap_or_default();

    WeatherSnapshot {
        city: raw.name,
        country: raw.sys.country,
        temperature: round1(raw.main.temp),
        feels_like: round1(raw.main.feels_like),
        temp_min: round1(raw.main.temp_min),
        temp_max: round1(raw.main.temp_max),
        humidity: raw.main.humidity,
        pressure: raw.main.pressure,
        wind_speed: round1(raw.wind.speed),
        wind_direction: raw.wind.deg.unwrap_or(0),
        condition: condition.main,
        description: title_case(&condition.description),
        icon: condition.icon,
        clouds: raw.clouds.all,
        visibility_km: f64::from(raw.visibility.unwrap_or(0)) / 1000.0,
        sunrise: utc_from_unix(raw.sys.sunrise),
        sunset: utc_from_unix(raw.sys.sunset),
        timezone_offset: raw.timezone,
        fetched_at: Utc::now(),
    }
}

fn map_sample(entry: OwForecastEntry) -> ForecastSample {
    let condition = entry.weather.into_iter().next().unwrap_or_default();

    ForecastSample {
        timestamp: entry.dt,
        temperature: entry.main.temp,
        humidity: entry.main.humidity,
        wind_speed: entry.wind.speed,
        condition: Condition {
            group: condition.main,
            description: condition.description,
            icon: condition.icon,
        },
    }
}

fn utc_from_unix(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    name: String,
    timezone: i32,
    main: OwCurrentMain,
    weather: Vec<OwCondition>,
    wind: OwWind,
    clouds: OwClouds,
    /// Meters; occasionally absent.
    visibility: Option<u32>,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize, Default)]
struct OwCondition {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecast {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwEntryMain,
    weather: Vec<OwCondition>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwEntryMain {
    temp: f64,
    humidity: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_JSON: &str = r#"{
        "name": "London",
        "timezone": 3600,
        "main": {
            "temp": 11.27,
            "feels_like": 10.48,
            "temp_min": 9.92,
            "temp_max": 12.84,
            "humidity": 81,
            "pressure": 1012
        },
        "weather": [
            {"main": "Rain", "description": "light RAIN", "icon": "10d"}
        ],
        "wind": {"speed": 4.63},
        "clouds": {"all": 75},
        "visibility": 10000,
        "sys": {"country": "GB", "sunrise": 1735718400, "sunset": 1735747200}
    }"#;

    #[test]
    fn current_payload_maps_with_rounding_and_defaults() {
        let raw: OwCurrent = serde_json::from_str(CURRENT_JSON).unwrap();
        let snapshot = map_current(raw);

        assert_eq!(snapshot.city, "London");
        assert_eq!(snapshot.country, "GB");
        assert_eq!(snapshot.temperature, 11.3);
        assert_eq!(snapshot.feels_like, 10.5);
        assert_eq!(snapshot.temp_min, 9.9);
        assert_eq!(snapshot.temp_max, 12.8);
        assert_eq!(snapshot.humidity, 81);
        assert_eq!(snapshot.pressure, 1012);
        assert_eq!(snapshot.wind_speed, 4.6);
        // Absent wind direction defaults to 0 degrees.
        assert_eq!(snapshot.wind_direction, 0);
        assert_eq!(snapshot.condition, "Rain");
        assert_eq!(snapshot.description, "Light Rain");
        assert_eq!(snapshot.icon, "10d");
        assert_eq!(snapshot.clouds, 75);
        // 10000 meters becomes 10.0 km.
        assert_eq!(snapshot.visibility_km, 10.0);
        assert_eq!(snapshot.sunrise.timestamp(), 1_735_718_400);
        assert_eq!(snapshot.sunset.timestamp(), 1_735_747_200);
        assert_eq!(snapshot.timezone_offset, 3600);
    }

    #[test]
    fn missing_visibility_maps_to_zero() {
        let mut value: serde_json::Value = serde_json::from_str(CURRENT_JSON).unwrap();
        value.as_object_mut().unwrap().remove("visibility");

        let raw: OwCurrent = serde_json::from_value(value).unwrap();
        let snapshot = map_current(raw);

        assert_eq!(snapshot.visibility_km, 0.0);
    }

    #[test]
    fn empty_weather_list_maps_to_blank_condition() {
        let mut value: serde_json::Value = serde_json::from_str(CURRENT_JSON).unwrap();
        value["weather"] = serde_json::json!([]);

        let raw: OwCurrent = serde_json::from_value(value).unwrap();
        let snapshot = map_current(raw);

        assert_eq!(snapshot.condition, "");
        assert_eq!(snapshot.description, "");
    }

    #[test]
    fn status_404_classifies_as_not_found_with_city() {
        let fault = classify_status(404, "Nonexistentville", r#"{"cod":"404"}"#).unwrap();

        match fault {
            WeatherError::NotFound { city } => assert_eq!(city, "Nonexistentville"),
            other => panic!("expected NotFound, got {other:?}"),
        }
        let fault = classify_status(404, "Nonexistentville", "").unwrap();
        assert!(fault.to_string().contains("Nonexistentville"));
    }

    #[test]
    fn status_401_classifies_as_unauthorized_regardless_of_body() {
        for body in ["", "not json at all", r#"{"message":"bad key"}"#] {
            let fault = classify_status(401, "London", body).unwrap();
            assert!(matches!(fault, WeatherError::Unauthorized));
        }
    }

    #[test]
    fn other_failure_statuses_carry_status_and_body() {
        let fault = classify_status(500, "London", "internal").unwrap();

        match fault {
            WeatherError::Provider { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal");
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn success_statuses_classify_as_none() {
        assert!(classify_status(200, "London", "{}").is_none());
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);

        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncation_respects_multibyte_char_boundaries() {
        // 1 ascii byte then two-byte chars: byte 200 falls inside a char.
        let body = format!("a{}", "é".repeat(150));
        let fault = classify_status(500, "London", &body).unwrap();

        match fault {
            WeatherError::Provider { body, .. } => {
                assert!(body.ends_with("..."));
                assert_eq!(body.len(), 202);
            }
            other => panic!("expected Provider, got {other:?}"),
        }

        // All-multibyte body as well.
        let body = "°".repeat(300);
        assert!(truncate_body(&body).ends_with("..."));
    }

    #[test]
    fn blank_city_is_rejected_before_any_call() {
        assert!(validate_city("  ").is_err());
        assert_eq!(validate_city(" London ").unwrap(), "London");
    }
}
