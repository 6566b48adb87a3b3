use clap::Parser;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Interactive terminal weather app")]
pub struct Cli {
    /// City to load on startup; overrides DEFAULT_CITY.
    #[arg(long)]
    pub city: Option<String>,

    /// Temperature units, "celsius" or "fahrenheit"; overrides TEMPERATURE_UNIT.
    #[arg(long)]
    pub units: Option<String>,
}
