//! # Scan Runner
//!
//! Entry points for campground scans: a command line tool that reads a TOML config
//! file and exports results to CSV, and an event-driven handler configured from the
//! environment. Both build the same [`campground_scan::ScanRun`].

/// Command line arguments
pub mod cli;
/// TOML config file
pub mod file_config;
/// Environment configuration for triggered runs
pub mod trigger_config;

use std::sync::Arc;

use campground_scan::{
    CsvExporter, FetchMode, RunOutcome, ScanError, ScanRun, Scanner, dry_run_notifier,
    notifier_from_settings,
};
use rec_gov::AvailabilityClient;

pub use cli::CliArgs;
pub use file_config::FileConfig;
pub use trigger_config::TriggerConfig;

/// Run a scan the way the `campsites` command does.
pub async fn run_cli(args: &CliArgs) -> Result<RunOutcome, ScanError> {
    let file_config = FileConfig::load(&args.config)?;
    let config = args.scan_config(&file_config)?;

    let notifier = if args.dry_run {
        log::info!("Dry run: notifications are logged, not sent");
        dry_run_notifier(file_config.gmail.as_ref(), file_config.twilio.as_ref())
    } else {
        notifier_from_settings(file_config.gmail.as_ref(), file_config.twilio.as_ref())?
    };
    if !notifier.has_channels() {
        log::warn!(
            "No [gmail] or [twilio] section in {}, matches will not be sent anywhere",
            args.config.display()
        );
    }

    if config.fetch_mode == FetchMode::Month {
        log::info!("Using monthly availability requests");
    }

    let client = AvailabilityClient::new()?;
    let mut run = ScanRun::new(Scanner::new(Arc::new(client), config), notifier);
    if !args.no_export {
        run = run.with_exporter(CsvExporter::new(&args.results_dir));
    }

    run.execute().await
}

/// Run a scan the way the event-driven handler does; no CSV is written.
pub async fn run_triggered(config: &TriggerConfig) -> Result<RunOutcome, ScanError> {
    let notifier = notifier_from_settings(Some(&config.email), config.sms.as_ref())?;
    let client = AvailabilityClient::new()?;
    let run = ScanRun::new(Scanner::new(Arc::new(client), config.scan_config()), notifier);

    run.execute().await
}
