use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Text};
use weather_api::logging;
use weather_core::{Catalog, Settings, WeatherService};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather API server and CLI")]
pub struct Cli {
    /// Settings file; defaults to the platform config directory.
    #[arg(long, global = true, env = "WEATHER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },

    /// Show weather for a city.
    Show {
        /// City name, e.g. "New York".
        city: String,
    },

    /// List the cities with weather data.
    Cities,

    /// Compute the heat index.
    HeatIndex {
        /// Temperature in °F.
        #[arg(allow_negative_numbers = true)]
        temperature: f64,

        /// Relative humidity in percent (0-100).
        #[arg(allow_negative_numbers = true)]
        humidity: i32,
    },

    /// Show app name, version and debug flag.
    Info,

    /// Interactively write the settings file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Cli { config, command } = self;

        if let Command::Configure = command {
            return configure(config);
        }

        let settings = Settings::load(config.as_deref())?;
        logging::init(settings.debug)?;

        let catalog = Catalog::load(settings.catalog_file.as_deref())?;
        let service = WeatherService::with_catalog(settings, catalog);

        match command {
            Command::Serve { host, port } => {
                let addr: SocketAddr = format!("{host}:{port}")
                    .parse()
                    .with_context(|| format!("Invalid listen address {host}:{port}"))?;
                weather_api::serve(Arc::new(service), addr).await?;
            }
            Command::Show { city } => {
                let report = service.report(&city)?;
                let record = &report.record;
                println!("{}", record.city);
                println!("  Temperature: {:.1} °F", record.temperature);
                println!("  Humidity:    {}%", record.humidity);
                println!("  Condition:   {}", record.condition);
                println!("  {}", record.description);
                if let Some(warning) = &report.warning {
                    println!("  Warning: {warning}");
                }
            }
            Command::Cities => {
                for city in service.list_cities() {
                    println!("{city}");
                }
            }
            Command::HeatIndex {
                temperature,
                humidity,
            } => {
                let hi = service.get_heat_index(temperature, humidity)?;
                println!("Heat index for {temperature} °F at {humidity}% humidity: {hi:.1} °F");
            }
            Command::Info => {
                let info = service.get_info();
                println!("{} {} (debug: {})", info.app_name, info.version, info.debug_mode);
            }
            Command::Configure => {}
        }

        Ok(())
    }
}

fn configure(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => Settings::config_file_path()?,
    };
    let current = Settings::from_file(&path)?;

    let app_name = Text::new("App name:")
        .with_default(&current.app_name)
        .prompt()?;
    let debug = Confirm::new("Enable debug mode?")
        .with_default(current.debug)
        .prompt()?;
    let max_temperature = CustomType::<f64>::new("Max temperature for heat index (°F):")
        .with_default(current.max_temperature)
        .prompt()?;

    let settings = Settings {
        app_name,
        debug,
        max_temperature,
        ..current
    };
    settings.validate()?;
    settings.save(&path)?;

    println!("Saved settings to {}", path.display());
    Ok(())
}
