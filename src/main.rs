//! hospital-finder CLI entry point
//!
//! Nearest-hospital lookup from the terminal

use hospital_finder::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        // Page failures were already printed by the console notifier
        if !e.is_user_facing() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
