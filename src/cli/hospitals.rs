//! Hospitals command handler
//!
//! Resolves (or takes) a location, queries the lookup service and prints the
//! ranked selection list.

use crate::cli::{terminal_page, CoordArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::hospitals::{SelectionEntry, SelectionList};
use crate::ui::{LocationField, SelectionControl};
use clap::Args;
use serde::Serialize;

/// Hospitals command arguments
#[derive(Args)]
pub struct HospitalsArgs {
    /// Location string as printed by `locate`
    /// (e.g. "Latitude: 12.97, Longitude: 77.59")
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub location: Option<String>,

    #[command(flatten)]
    pub coords: CoordArgs,

    /// Resolve the location by IP geolocation, whatever `location.provider` says
    #[arg(long, conflicts_with_all = ["location", "lat", "lng"])]
    pub here: bool,

    /// Search radius in kilometers, sent to the service as given
    #[arg(long, short = 'r')]
    pub radius: Option<String>,

    /// Lookup service root URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Append a map link to each hospital
    #[arg(long)]
    pub links: bool,

    /// Map provider for --links
    #[arg(long)]
    pub provider: Option<String>,
}

/// One hospital in JSON output
#[derive(Serialize)]
struct HospitalRow<'a> {
    name: &'a str,
    address: &'a str,
    latitude: f64,
    longitude: f64,
    distance_km: f64,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    map_url: Option<String>,
}

/// Run the hospitals command
pub async fn run(args: HospitalsArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(base_url) = args.base_url.clone() {
        config.lookup.base_url = base_url;
    }
    if args.here {
        config.location.provider = "ip".to_string();
    }

    let terminal = terminal_page(&config, args.coords.coordinate())?;

    match &args.location {
        Some(location) => terminal.location_field.set_value(location),
        None => {
            terminal.page.on_get_location().await?;
        }
    }

    let radius = args
        .radius
        .clone()
        .unwrap_or_else(|| config.defaults.radius_km.to_string());

    let list = terminal.page.on_get_hospitals(&radius).await?;

    if args.json {
        print_json(&list, &config, &args)?;
    } else {
        print_text(&terminal.destination.entries(), &list, &config, &args)?;
    }

    Ok(())
}

fn map_link(config: &Config, args: &HospitalsArgs, lat: f64, lng: f64) -> Result<Option<String>> {
    if !args.links {
        return Ok(None);
    }
    config.format_url(args.provider.as_deref(), lat, lng).map(Some)
}

fn print_json(list: &SelectionList, config: &Config, args: &HospitalsArgs) -> Result<()> {
    let rows = list
        .facilities()
        .iter()
        .map(|ranked| {
            Ok::<_, Error>(HospitalRow {
                name: &ranked.facility.name,
                address: &ranked.facility.address,
                latitude: ranked.facility.latitude,
                longitude: ranked.facility.longitude,
                distance_km: ranked.distance_km,
                label: ranked.label(),
                map_url: map_link(config, args, ranked.facility.latitude, ranked.facility.longitude)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn print_text(
    entries: &[SelectionEntry],
    list: &SelectionList,
    config: &Config,
    args: &HospitalsArgs,
) -> Result<()> {
    // Placeholder first, then one line per facility in list order
    for entry in entries.iter().filter(|e| e.placeholder) {
        println!("{}", entry.label);
    }

    for (i, ranked) in list.facilities().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, ranked.label());
        if let Some(url) = map_link(config, args, ranked.facility.latitude, ranked.facility.longitude)? {
            println!("      {}", url);
        }
    }

    if let Some(nearest) = list.nearest() {
        println!();
        println!("Nearest: {}", nearest.label());
    }

    Ok(())
}
