use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rec_gov::{AvailabilityClient, CampgroundAvailabilityResponse, RecGovError};
use tracing::{debug, info, warn};

use crate::filter::filter_campsite;
use crate::scan_types::*;

/// Where campground availability comes from
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Availability of one campground over `window`
    async fn campground_availability(
        &self,
        campground_id: &str,
        window: &DateWindow,
    ) -> Result<CampgroundAvailabilityResponse, RecGovError>;

    /// Availability of one campground for the month containing `month`
    async fn monthly_availability(
        &self,
        campground_id: &str,
        month: NaiveDate,
    ) -> Result<CampgroundAvailabilityResponse, RecGovError>;
}

#[async_trait]
impl AvailabilitySource for AvailabilityClient {
    async fn campground_availability(
        &self,
        campground_id: &str,
        window: &DateWindow,
    ) -> Result<CampgroundAvailabilityResponse, RecGovError> {
        self.get_campground_availability(campground_id, window.start, window.end)
            .await
    }

    async fn monthly_availability(
        &self,
        campground_id: &str,
        month: NaiveDate,
    ) -> Result<CampgroundAvailabilityResponse, RecGovError> {
        self.get_monthly_availability(campground_id, month).await
    }
}

/// A campground whose availability could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Campground id
    pub campground_id: String,
    /// Campground display name
    pub campground_name: String,
    /// Rendered error
    pub error: String,
}

/// Result of scanning every configured campground
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Matches in campground order, then API order
    pub matches: Vec<AvailabilityMatch>,
    /// Campgrounds that contributed nothing because their fetch failed
    pub failures: Vec<FetchFailure>,
    /// Number of campgrounds attempted
    pub campgrounds_checked: usize,
}

impl ScanReport {
    /// Whether any match was found
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Runs the fetch and filter steps over all configured campgrounds
pub struct Scanner {
    source: Arc<dyn AvailabilitySource>,
    config: ScanConfig,
    criteria: ScanCriteria,
}

impl Scanner {
    /// Create a scanner.
    ///
    /// In [`FetchMode::Month`] the responses span whole months, so the criteria are
    /// narrowed to the configured window unless they already carry one.
    pub fn new(source: Arc<dyn AvailabilitySource>, config: ScanConfig) -> Self {
        let mut criteria = config.criteria.clone();
        if config.fetch_mode == FetchMode::Month && criteria.window.is_none() {
            criteria.window = Some(config.window);
        }

        Self {
            source,
            config,
            criteria,
        }
    }

    /// The window this scanner queries
    pub fn window(&self) -> DateWindow {
        self.config.window
    }

    /// Scan every campground, one after another.
    ///
    /// A campground whose fetch fails is logged and recorded in
    /// [`ScanReport::failures`]; the remaining campgrounds are still scanned.
    pub async fn run(&self) -> ScanReport {
        info!(
            "Scanning {} campgrounds from {} to {}",
            self.config.campgrounds.len(),
            self.config.window.start,
            self.config.window.end
        );

        let mut report = ScanReport::default();

        for campground in &self.config.campgrounds {
            report.campgrounds_checked += 1;

            match self.scan_campground(campground).await {
                Ok(matches) => {
                    debug!(
                        "Found {} matching slots at {} ({})",
                        matches.len(),
                        campground.name,
                        campground.id
                    );
                    report.matches.extend(matches);
                }
                Err(e) => {
                    warn!(
                        "Skipping {} ({}), no availability recorded: {}",
                        campground.name, campground.id, e
                    );
                    report.failures.push(FetchFailure {
                        campground_id: campground.id.clone(),
                        campground_name: campground.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Scan finished: {} matches, {} failed campgrounds",
            report.matches.len(),
            report.failures.len()
        );

        report
    }

    async fn scan_campground(
        &self,
        campground: &Campground,
    ) -> Result<Vec<AvailabilityMatch>, RecGovError> {
        let responses = match self.config.fetch_mode {
            FetchMode::Range => vec![
                self.source
                    .campground_availability(&campground.id, &self.config.window)
                    .await?,
            ],
            FetchMode::Month => {
                let mut responses = Vec::new();
                for month in self.config.window.months() {
                    responses.push(
                        self.source
                            .monthly_availability(&campground.id, month)
                            .await?,
                    );
                }
                responses
            }
        };

        let matches = responses
            .iter()
            .flat_map(|response| response.campsites.iter())
            .flat_map(|(campsite_key, campsite)| {
                filter_campsite(&campground.name, campsite_key, campsite, &self.criteria)
            })
            .collect();

        Ok(matches)
    }
}
