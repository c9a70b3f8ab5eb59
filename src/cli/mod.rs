//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod hospitals;
pub mod locate;

use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::{get_position_provider, DevicePosition, LocationResolver};
use crate::hospitals::lookup::HttpFacilityLookup;
use crate::hospitals::HospitalRanker;
use crate::page::{LocatorPage, Surfaces};
use crate::ui::console::ConsoleNotifier;
use crate::ui::{Button, OptionList, TextField};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Nearest-hospital finder
#[derive(Parser)]
#[command(name = "hospital-finder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log progress to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the current location
    Locate(locate::LocateArgs),

    /// List hospitals near a location, with distances
    Hospitals(hospitals::HospitalsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Explicit coordinate arguments shared by commands
#[derive(Args, Debug, Clone, Copy)]
pub struct CoordArgs {
    /// Latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,
}

impl CoordArgs {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Locate(args) => locate::run(args).await,
        Commands::Hospitals(args) => hospitals::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Initialize logging to stderr
///
/// `RUST_LOG` overrides the level picked by `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Terminal-backed page plus handles to its surfaces
pub(crate) struct TerminalPage {
    pub page: LocatorPage<DevicePosition, HttpFacilityLookup>,
    pub location_field: Arc<TextField>,
    pub destination: Arc<OptionList>,
}

/// Build a locator page wired to terminal surfaces
pub(crate) fn terminal_page(config: &Config, fixed: Option<Coordinate>) -> Result<TerminalPage> {
    let resolver = LocationResolver::from_capability(get_position_provider(config, fixed));
    let lookup = HttpFacilityLookup::new(config.lookup.base_url.clone(), config.request_timeout())
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

    let location_field = Arc::new(TextField::new());
    let destination = Arc::new(OptionList::new());

    let surfaces = Surfaces {
        location_field: location_field.clone(),
        locate_button: Arc::new(Button::new("")),
        destination: destination.clone(),
        notifier: Arc::new(ConsoleNotifier::new()),
    };

    Ok(TerminalPage {
        page: LocatorPage::new(resolver, HospitalRanker::new(lookup), surfaces),
        location_field,
        destination,
    })
}
