use std::path::PathBuf;

use campground_scan::{DateWindow, FetchMode, ScanConfig, ScanError, WeekdaySet};
use clap::Parser;

use crate::FileConfig;

/// Find campground availabilities on recreation.gov and get notified about them.
///
/// Example: campsites --start_date 2019-07-04 --end_date 2019-09-04 --days-to-include 4,5,6
#[derive(Debug, Clone, Parser)]
#[command(name = "campsites", version, about, long_about = None)]
pub struct CliArgs {
    /// Start date [YYYY-MM-DD]
    #[arg(long = "start_date", value_name = "YYYY-MM-DD")]
    pub start_date: String,

    /// End date [YYYY-MM-DD], defaults to the day after the start date
    #[arg(long = "end_date", value_name = "YYYY-MM-DD")]
    pub end_date: Option<String>,

    /// Comma separated days of week to include, 0 (Monday) to 6 (Sunday)
    #[arg(long = "days-to-include", value_name = "0,1,2,3,4,5,6")]
    pub days_to_include: WeekdaySet,

    /// TOML file with [gmail], [twilio], [filter] and [[campgrounds]] sections
    #[arg(long, default_value = "campsites.toml")]
    pub config: PathBuf,

    /// Directory the results CSV is written to
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Query whole months instead of the exact date range
    #[arg(long)]
    pub month: bool,

    /// Drop matches outside the start and end dates
    #[arg(long)]
    pub within_window: bool,

    /// Do not write the results CSV
    #[arg(long)]
    pub no_export: bool,

    /// Log notifications instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// The dates this invocation covers
    pub fn window(&self) -> Result<DateWindow, ScanError> {
        DateWindow::parse(&self.start_date, self.end_date.as_deref())
    }

    /// Combine the arguments with the config file into a scan configuration
    pub fn scan_config(&self, file_config: &FileConfig) -> Result<ScanConfig, ScanError> {
        let window = self.window()?;

        let mut config = ScanConfig::new(window, self.days_to_include)
            .with_campgrounds(file_config.campgrounds());
        config.criteria.site_type = file_config.filter.site_type.clone();
        config.criteria.available_status = file_config.filter.available_status.clone();

        if self.within_window {
            config.criteria = config.criteria.within(window);
        }
        if self.month {
            config = config.with_fetch_mode(FetchMode::Month);
        }

        log::debug!(
            "Scanning {} campgrounds for {} sites",
            config.campgrounds.len(),
            config.criteria.site_type
        );

        Ok(config)
    }
}
