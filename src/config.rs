//! Command-line configuration

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tui_dispatch_debug::DebugCliArgs;

use crate::action::Action;
use crate::api::{WeatherConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::locations::{LocationTree, LocationsError};

/// Environment fallback for `--api-key`
pub const API_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";

/// Pick a country, state and city, then look up the weather
#[derive(Parser, Debug)]
#[command(name = "cities-weather")]
#[command(about = "Cascading city picker with current weather from OpenWeatherMap")]
pub struct Args {
    /// Location tree as JSON; the bundled sample is used when omitted
    #[arg(long)]
    pub locations: Option<PathBuf>,

    /// OpenWeatherMap API key (falls back to $OPENWEATHERMAP_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// API origin
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds (minimum 1)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Preselect a country
    #[arg(long)]
    pub country: Option<String>,

    /// Preselect a state within the country
    #[arg(long)]
    pub state: Option<String>,

    /// Preselect a city within the state
    #[arg(long)]
    pub city: Option<String>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub debug: DebugCliArgs,
}

impl Args {
    pub fn api_key(&self) -> String {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .unwrap_or_default()
    }

    pub fn weather_config(&self) -> WeatherConfig {
        WeatherConfig::new(self.api_key())
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    pub fn load_locations(&self) -> Result<LocationTree, LocationsError> {
        match &self.locations {
            Some(path) => LocationTree::load(path),
            None => Ok(LocationTree::sample()),
        }
    }

    /// Selection actions to replay on the initial state, outermost first
    pub fn preselect_actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(country) = &self.country {
            actions.push(Action::CountrySelect(country.clone()));
        }
        if let Some(state) = &self.state {
            actions.push(Action::RegionSelect(state.clone()));
        }
        if let Some(city) = &self.city {
            actions.push(Action::CitySelect(city.clone()));
        }
        actions
    }
}

/// Route tracing output to `path`. The terminal owns stdout, so without a
/// log file nothing is installed.
pub fn init_logging(path: &Path) -> io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::other(format!("failed to init logging: {e}")))
}
