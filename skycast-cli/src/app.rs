use anyhow::Result;
use inquire::{InquireError, Text};

use skycast_core::{
    ForecastDay, MAX_FORECAST_DAYS, OpenWeatherClient, Units, WeatherSnapshot,
};

use crate::render;

/// State of one interactive session: the city and units in effect plus the
/// last fetched records. Owned by the menu loop and mutated only between
/// completed request/response cycles.
pub struct Session {
    client: OpenWeatherClient,
    city: String,
    units: Units,
    current: Option<WeatherSnapshot>,
    forecast: Option<Vec<ForecastDay>>,
}

impl Session {
    pub fn new(client: OpenWeatherClient, city: String, units: Units) -> Self {
        Self { client, city, units, current: None, forecast: None }
    }

    /// Main menu loop. Provider faults are rendered and control returns to
    /// the menu; only user exit (including a cancelled prompt) leaves it.
    pub async fn run(&mut self) -> Result<()> {
        tracing::debug!(city = %self.city, units = self.units.as_query(), "starting session");
        render::welcome();

        let city = self.city.clone();
        self.fetch_weather(&city).await;

        loop {
            render::menu();

            let choice = match Text::new("Enter your choice (1-5):").prompt() {
                Ok(choice) => choice,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(err) => return Err(err.into()),
            };

            match choice.trim() {
                "1" => self.search_city().await?,
                "2" => self.toggle_units().await,
                "3" => self.refresh().await,
                "4" => self.show_forecast().await,
                "5" => break,
                other => render::error(&format!(
                    "Invalid choice '{other}'. Please enter a number between 1 and 5."
                )),
            }
        }

        render::goodbye();
        Ok(())
    }

    async fn search_city(&mut self) -> Result<()> {
        let input = match Text::new("Enter city name (e.g., London or London,UK):").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let city = input.trim();
        if city.is_empty() {
            render::error("City name cannot be empty.");
            return Ok(());
        }

        self.fetch_weather(city).await;
        Ok(())
    }

    async fn toggle_units(&mut self) {
        self.units = self.units.toggled();
        println!("\n✓ Switched to {}", self.units);

        // Records keep the units they were fetched with; re-fetch instead of
        // converting in place.
        let city = self.city.clone();
        self.fetch_weather(&city).await;
    }

    async fn refresh(&mut self) {
        let city = self.city.clone();
        self.fetch_weather(&city).await;
    }

    /// Fetch and display current weather; the session city only advances on
    /// success, so a typo never clobbers a working city.
    async fn fetch_weather(&mut self, city: &str) {
        render::loading(&format!("Fetching weather for {city}..."));

        match self.client.fetch_current(city, self.units).await {
            Ok(snapshot) => {
                self.city = city.to_string();
                render::current_weather(&snapshot, self.units);
                self.current = Some(snapshot);
            }
            Err(fault) => render::error(&fault.to_string()),
        }
    }

    async fn show_forecast(&mut self) {
        render::loading(&format!("Fetching forecast for {}...", self.city));

        match self.client.fetch_forecast(&self.city, self.units, MAX_FORECAST_DAYS).await {
            Ok(days) => {
                self.forecast = Some(days);

                if let Some(snapshot) = &self.current {
                    render::current_weather(snapshot, self.units);
                }
                if let Some(days) = &self.forecast {
                    render::forecast(&self.city, days, self.units);
                }
            }
            Err(fault) => render::error(&fault.to_string()),
        }
    }
}
