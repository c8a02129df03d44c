use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::RecGovError;
use crate::ordered::ordered_entries;

/// Public site root, used to build booking links.
pub const SITE_URL: &str = "https://www.recreation.gov";

/// Root of the internal availability API.
pub const DEFAULT_API_BASE_URL: &str = "https://www.recreation.gov/api";

/// Path of the campsite booking page, relative to [`SITE_URL`].
pub const CAMPSITES_PATH: &str = "/camping/campsites/";

/// recreation.gov rejects requests that do not look like they come from a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/97.0.4692.71 Safari/537.36";

const START_OF_DAY: &str = "T00:00:00.000Z";

/// Formats a calendar date the way the availability endpoint expects: midnight UTC.
pub fn midnight_utc(date: NaiveDate) -> String {
    format!("{}{}", date.format("%Y-%m-%d"), START_OF_DAY)
}

/// Booking page for a single campsite.
pub fn booking_url(campsite_id: &str) -> String {
    format!("{SITE_URL}{CAMPSITES_PATH}{campsite_id}")
}

/// Client for the recreation.gov availability API
pub struct AvailabilityClient {
    client: Client,
    base_url: String,
}

/// Response of the campground availability endpoints
#[derive(Debug, Default, Deserialize)]
pub struct CampgroundAvailabilityResponse {
    /// Campsites keyed by campsite id, in the order the API returned them.
    #[serde(default, deserialize_with = "ordered_entries")]
    pub campsites: Vec<(String, CampsiteAvailability)>,
}

/// Availability calendar of one campsite
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CampsiteAvailability {
    /// Campsite id; mirrors the key in [`CampgroundAvailabilityResponse::campsites`].
    #[serde(default)]
    pub campsite_id: Option<String>,

    /// Free-text site type, e.g. "STANDARD NONELECTRIC".
    #[serde(default)]
    pub campsite_type: Option<String>,

    /// Loop the site belongs to.
    #[serde(rename = "loop", default)]
    pub campsite_loop: Option<String>,

    /// Site label shown on the booking page.
    #[serde(default)]
    pub site: Option<String>,

    /// Timestamp (`YYYY-MM-DDTHH:MM:SSZ`) to reservation status, in API order.
    ///
    /// Statuses are kept as raw JSON; the API sometimes sends `null` for a date.
    #[serde(default, deserialize_with = "ordered_entries")]
    pub availabilities: Vec<(String, Value)>,
}

impl AvailabilityClient {
    /// Create a client pointed at the production API
    pub fn new() -> Result<Self, RecGovError> {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Create a client with a custom API root (for testing against a mock server)
    pub fn with_base_url(base_url: &str) -> Result<Self, RecGovError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(RecGovError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get campground availability between two dates
    pub async fn get_campground_availability(
        &self,
        campground_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<CampgroundAvailabilityResponse, RecGovError> {
        debug!(
            "Fetching availability for campground {} from {} to {}",
            campground_id, start_date, end_date
        );

        let url = format!(
            "{}/camps/availability/campground/{}",
            self.base_url, campground_id
        );
        let params = [
            ("start_date", midnight_utc(start_date)),
            ("end_date", midnight_utc(end_date)),
        ];

        self.fetch(&url, &params).await
    }

    /// Get a whole month of campground availability.
    ///
    /// Any date inside the month may be passed; the request always starts on the first.
    pub async fn get_monthly_availability(
        &self,
        campground_id: &str,
        month: NaiveDate,
    ) -> Result<CampgroundAvailabilityResponse, RecGovError> {
        let month_start = month
            .with_day(1)
            .ok_or_else(|| RecGovError::Decode(format!("Invalid month: {}", month)))?;

        debug!(
            "Fetching monthly availability for campground {} starting {}",
            campground_id, month_start
        );

        let url = format!(
            "{}/camps/availability/campground/{}/month",
            self.base_url, campground_id
        );
        let params = [("start_date", midnight_utc(month_start))];

        self.fetch(&url, &params).await
    }

    async fn fetch(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<CampgroundAvailabilityResponse, RecGovError> {
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            warn!("API request failed with status {}: {}", status, body);

            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => RecGovError::RateLimited,
                StatusCode::NOT_FOUND => RecGovError::NotFound,
                _ => RecGovError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RecGovError::Decode(e.to_string()))
    }
}
