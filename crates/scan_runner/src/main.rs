//! `campsites`: scan recreation.gov once, notify, and save the matches to CSV.

use anyhow::Context;
use clap::Parser;
use scan_runner::{CliArgs, run_cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = CliArgs::parse();
    log::info!(
        "🏕️ Looking for campsites from {} to {}",
        args.start_date,
        args.end_date.as_deref().unwrap_or("the next day")
    );

    let outcome = match run_cli(&args).await {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("Runtime error: {}", e);
            return Err(e).context("campground scan failed");
        }
    };

    for failure in &outcome.report.failures {
        println!(
            "Runtime error: {} ({}): {}",
            failure.campground_name, failure.campground_id, failure.error
        );
    }

    if outcome.report.has_matches() {
        log::info!(
            "✅ Found {} available campsites",
            outcome.report.matches.len()
        );
        if let Some(path) = outcome.export_path {
            log::info!("📁 Results saved to {}", path.display());
        }
    }

    Ok(())
}
