use amap_weather_core::{Config, QueryType, TransportOptions, WeatherClient, WeatherResult};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode};
use serde_json::json;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "amap-weather", version, about = "AMap weather CLI")]
pub struct Cli {
    /// API key to use instead of the configured one.
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and transport settings.
    Configure,

    /// Show current conditions for a city.
    Live(QueryArgs),

    /// Show the multi-day forecast for a city.
    Forecast(QueryArgs),
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// City name or adcode, e.g. "深圳" or "440300".
    pub city: String,

    /// Response format: json or xml.
    #[arg(long, default_value = "json")]
    pub format: String,

    /// Print the provider's JSON as-is instead of a summary.
    #[arg(long)]
    pub raw: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Live(args) => show(self.key, QueryType::Live, args).await,
            Command::Forecast(args) => show(self.key, QueryType::Forecast, args).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("AMap API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let timeout = CustomType::<f64>::new("Request timeout in seconds (0 for none):")
        .with_default(5.0)
        .with_error_message("Please enter a number")
        .prompt()
        .context("Failed to read timeout")?;

    cfg.set_api_key(api_key.trim().to_string());
    cfg.set_transport_option("timeout", (timeout > 0.0).then(|| json!(timeout)));

    let path = cfg.save()?;
    tracing::info!(path = %path.display(), "saved configuration");
    println!("Configuration saved to {}", path.display());

    Ok(())
}

async fn show(key: Option<String>, kind: QueryType, args: QueryArgs) -> anyhow::Result<()> {
    let client = client_for(key, Config::load())?;

    tracing::debug!(city = %args.city, %kind, format = %args.format, "running query");

    let result = client.query(&args.city, kind, &args.format).await?;

    match &result {
        WeatherResult::Xml(text) => println!("{text}"),
        WeatherResult::Json(map) if args.raw => println!("{}", serde_json::to_string_pretty(map)?),
        WeatherResult::Json(_) => println!("{}", output::render(&result.report()?)?),
    }

    Ok(())
}

/// Build the client for a query.
///
/// An explicit `--key` only borrows transport settings from the config file,
/// so an unreadable file is logged and skipped rather than fatal.
fn client_for(
    key: Option<String>,
    loaded: anyhow::Result<Config>,
) -> anyhow::Result<WeatherClient> {
    let Some(key) = key else {
        return loaded?.client();
    };

    let transport = match loaded {
        Ok(cfg) => cfg.transport,
        Err(err) => {
            tracing::warn!("ignoring config file, using default transport settings: {err:#}");
            TransportOptions::default()
        }
    };

    let mut client = WeatherClient::new(key);
    client.configure_transport(transport);
    Ok(client)
}
