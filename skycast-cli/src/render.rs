//! Terminal output for weather records. Pure sink: takes structured values,
//! prints, returns nothing.

use chrono::{DateTime, FixedOffset, Utc};
use skycast_core::{ForecastDay, Units, WeatherSnapshot};

pub fn welcome() {
    println!();
    println!("🌤️  skycast — weather in your terminal  🌤️");
}

pub fn menu() {
    println!();
    println!("  [1] Search for a city");
    println!("  [2] Toggle temperature unit (°C/°F)");
    println!("  [3] Refresh current weather");
    println!("  [4] View forecast");
    println!("  [5] Exit");
}

pub fn loading(message: &str) {
    println!("\n⏳ {message}");
}

pub fn error(message: &str) {
    eprintln!("\n❌ {message}");
}

pub fn goodbye() {
    println!("\n👋 Thank you for using skycast! Stay safe!\n");
}

pub fn current_weather(snapshot: &WeatherSnapshot, units: Units) {
    let symbol = units.temp_symbol();
    let icon = icon_for(&snapshot.condition);

    println!();
    println!("{icon}  {}, {}", snapshot.city, snapshot.country);
    println!("   {}{symbol} (feels like {}{symbol})", snapshot.temperature, snapshot.feels_like);
    println!("   {}", snapshot.description);
    println!();
    println!("   Min/Max:     {}{symbol} / {}{symbol}", snapshot.temp_min, snapshot.temp_max);
    println!("   Humidity:    {}%", snapshot.humidity);
    println!(
        "   Wind:        {} {} ({}°)",
        snapshot.wind_speed,
        units.wind_label(),
        snapshot.wind_direction
    );
    println!("   Pressure:    {} hPa", snapshot.pressure);
    println!("   Visibility:  {:.1} km", snapshot.visibility_km);
    println!("   Clouds:      {}%", snapshot.clouds);
    println!("   Sunrise:     🌅 {}", local_time(snapshot.sunrise, snapshot.timezone_offset));
    println!("   Sunset:      🌇 {}", local_time(snapshot.sunset, snapshot.timezone_offset));
    println!();
    println!("   Updated: {}", snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

pub fn forecast(city: &str, days: &[ForecastDay], units: Units) {
    let symbol = units.temp_symbol();

    println!();
    println!("📅 Forecast for {city}");
    println!(
        "{:<14} {:<22} {:<17} {:<10} {}",
        "Date", "Weather", "High/Low", "Humidity", "Wind"
    );

    for day in days {
        let weather = format!("{} {}", icon_for(&day.condition), day.description);
        let range = format!("{}{symbol} / {}{symbol}", day.temp_max, day.temp_min);
        println!(
            "{:<14} {:<22} {:<17} {:<10} {} {}",
            day.date.format("%a, %b %d"),
            weather,
            range,
            format!("{}%", day.humidity),
            day.wind_speed,
            units.wind_label()
        );
    }
}

/// Sunrise/sunset are stored in UTC; show them in the city's local time.
fn local_time(instant: DateTime<Utc>, offset_secs: i32) -> String {
    match FixedOffset::east_opt(offset_secs) {
        Some(offset) => instant.with_timezone(&offset).format("%H:%M").to_string(),
        None => instant.format("%H:%M UTC").to_string(),
    }
}

fn icon_for(group: &str) -> &'static str {
    match group {
        "Clear" => "☀️",
        "Clouds" => "☁️",
        "Rain" => "🌧️",
        "Drizzle" => "🌦️",
        "Thunderstorm" => "⛈️",
        "Snow" => "❄️",
        "Mist" | "Fog" | "Haze" => "🌫️",
        "Smoke" | "Dust" | "Sand" | "Squall" => "💨",
        "Ash" => "🌋",
        "Tornado" => "🌪️",
        _ => "🌡️",
    }
}
