use chrono::{NaiveDate, NaiveDateTime};
use rec_gov::{CampsiteAvailability, booking_url};
use tracing::warn;

use crate::{AvailabilityMatch, DISPLAY_DATE_FORMAT, ScanCriteria, WIRE_DATE_FORMAT};

/// Format a slot date for people, e.g. `2019-07-05 (Friday)`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Parse an availability key such as `2019-07-05T00:00:00Z`.
pub fn parse_slot_date(timestamp: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(timestamp, WIRE_DATE_FORMAT)
        .ok()
        .map(|datetime| datetime.date())
}

/// Collect the bookable slots of one campsite.
///
/// `campsite_key` is the id the campsite was listed under; it stands in for the
/// record's own `campsite_id` when that is missing. Matches come out in the
/// order of the campsite's availability calendar. Slots whose status is not a
/// string never match.
pub fn filter_campsite(
    park: &str,
    campsite_key: &str,
    campsite: &CampsiteAvailability,
    criteria: &ScanCriteria,
) -> Vec<AvailabilityMatch> {
    if campsite.campsite_type.as_deref() != Some(criteria.site_type.as_str()) {
        return Vec::new();
    }

    let campsite_id = campsite.campsite_id.as_deref().unwrap_or(campsite_key);
    let url = booking_url(campsite_id);

    campsite
        .availabilities
        .iter()
        .filter(|(_, status)| {
            status.as_str() == Some(criteria.available_status.as_str())
        })
        .filter_map(|(timestamp, _)| {
            let date = parse_slot_date(timestamp);
            if date.is_none() {
                warn!(
                    "Skipping campsite {} slot with unparseable date: {}",
                    campsite_id, timestamp
                );
            }
            date
        })
        .filter(|date| criteria.accepts_date(*date))
        .map(|date| AvailabilityMatch {
            park: park.to_string(),
            date: format_display_date(date),
            url: url.clone(),
        })
        .collect()
}
