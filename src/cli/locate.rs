//! Locate command handler
//!
//! Resolves the current location and prints the location string.

use crate::cli::{terminal_page, CoordArgs};
use crate::config::Config;
use crate::error::Result;
use crate::ui::LocationField;
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    #[command(flatten)]
    pub coords: CoordArgs,

    /// Print the coordinate as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let config = Config::load()?;
    let terminal = terminal_page(&config, args.coords.coordinate())?;

    let coords = terminal.page.on_get_location().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&coords)?);
    } else {
        println!("{}", terminal.location_field.value());
    }

    Ok(())
}
