use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, Weekday};
use rec_gov::RecGovError;
use serde::{Deserialize, Serialize};

use crate::NotificationError;

/// Site type a campsite must have to be reported.
pub const ACCEPTED_SITE_TYPE: &str = "STANDARD NONELECTRIC";

/// Reservation status that marks a slot as bookable.
pub const AVAILABLE_STATUS: &str = "Available";

/// Timestamp format of the availability keys returned by recreation.gov.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Date format used in notifications and exports, e.g. `2019-07-05 (Friday)`.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d (%A)";

/// Calendar date format accepted on the command line and in the environment.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Yosemite Valley and high country campgrounds scanned when nothing else is configured.
pub const DEFAULT_CAMPGROUNDS: &[(&str, &str)] = &[
    ("232447", "UPPER PINES"),
    ("232450", "LOWER PINES"),
    ("232449", "NORTH PINES"),
    ("232448", "TUOLOMNE MEADOWS"),
    ("232446", "Wawona"),
];

/// A campground to scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campground {
    /// recreation.gov facility id
    pub id: String,
    /// Display name used in notifications
    pub name: String,
}

impl Campground {
    /// Create a campground entry
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The default campground list, in scan order.
pub fn default_campgrounds() -> Vec<Campground> {
    DEFAULT_CAMPGROUNDS
        .iter()
        .map(|(id, name)| Campground::new(*id, *name))
        .collect()
}

/// A bookable slot that passed every filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityMatch {
    /// Campground display name
    pub park: String,
    /// Date in [`DISPLAY_DATE_FORMAT`]
    pub date: String,
    /// Booking page of the campsite
    pub url: String,
}

/// Inclusive range of calendar dates a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First date of the window
    pub start: NaiveDate,
    /// Last date of the window
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting one that ends before it starts
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ScanError> {
        if end < start {
            return Err(ScanError::InvalidDateRange);
        }
        Ok(Self { start, end })
    }

    /// Create a window whose end defaults to the day after `start`.
    pub fn with_default_end(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, ScanError> {
        let end = match end {
            Some(end) => end,
            None => start
                .succ_opt()
                .ok_or_else(|| ScanError::InvalidDate(start.to_string()))?,
        };
        Self::new(start, end)
    }

    /// Parse `YYYY-MM-DD` bounds; an empty or missing end defaults to the day after start.
    pub fn parse(start: &str, end: Option<&str>) -> Result<Self, ScanError> {
        let start = parse_calendar_date(start)?;
        let end = match end.map(str::trim).filter(|s| !s.is_empty()) {
            Some(end) => Some(parse_calendar_date(end)?),
            None => None,
        };
        Self::with_default_end(start, end)
    }

    /// Whether `date` lies inside the window, bounds included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// First day of every month the window touches, oldest first.
    pub fn months(&self) -> Vec<NaiveDate> {
        let mut months = Vec::new();
        let Some(mut month) = self.start.with_day(1) else {
            return months;
        };

        while month <= self.end {
            months.push(month);
            match month.checked_add_months(Months::new(1)) {
                Some(next) => month = next,
                None => break,
            }
        }

        months
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, ScanError> {
    NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT)
        .map_err(|_| ScanError::InvalidDate(value.to_string()))
}

/// Days of the week a match may fall on, indexed 0 = Monday .. 6 = Sunday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdaySet {
    bits: u8,
}

impl WeekdaySet {
    /// Every day of the week
    pub fn all() -> Self {
        Self { bits: 0b111_1111 }
    }

    /// Build a set from day indices (0 = Monday)
    pub fn from_indices<I>(indices: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut set = Self::default();
        for index in indices {
            if index > 6 {
                return Err(ScanError::InvalidWeekday(index.to_string()));
            }
            set.bits |= 1 << index;
        }
        Ok(set)
    }

    /// Add a weekday
    pub fn insert(&mut self, day: Weekday) {
        self.bits |= 1 << day.num_days_from_monday();
    }

    /// Whether `day` is in the set
    pub fn contains(&self, day: Weekday) -> bool {
        self.bits & (1 << day.num_days_from_monday()) != 0
    }

    /// Whether no day is selected
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl FromStr for WeekdaySet {
    type Err = ScanError;

    /// Parses a comma separated list such as `4,5,6`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let indices = s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                item.parse::<u32>()
                    .map_err(|_| ScanError::InvalidWeekday(item.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let set = Self::from_indices(indices)?;
        if set.is_empty() {
            return Err(ScanError::Validation(
                "At least one day to include is required".to_string(),
            ));
        }
        Ok(set)
    }
}

/// What a slot has to look like to be reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCriteria {
    /// Required campsite type, compared exactly
    pub site_type: String,
    /// Required reservation status, compared exactly
    pub available_status: String,
    /// Accepted weekdays
    pub weekdays: WeekdaySet,
    /// Optional inclusive date restriction
    pub window: Option<DateWindow>,
}

impl ScanCriteria {
    /// Criteria with the default site type and status
    pub fn new(weekdays: WeekdaySet) -> Self {
        Self {
            site_type: ACCEPTED_SITE_TYPE.to_string(),
            available_status: AVAILABLE_STATUS.to_string(),
            weekdays,
            window: None,
        }
    }

    /// Only accept dates inside `window`
    pub fn within(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Whether a slot date passes the weekday and window checks
    pub fn accepts_date(&self, date: NaiveDate) -> bool {
        self.weekdays.contains(date.weekday())
            && self.window.is_none_or(|window| window.contains(date))
    }
}

/// Which availability endpoint to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// One request per campground covering exactly the window
    #[default]
    Range,
    /// One request per campground and calendar month touched by the window
    Month,
}

/// Everything a scan needs to know
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Campgrounds in scan order
    pub campgrounds: Vec<Campground>,
    /// Dates to query
    pub window: DateWindow,
    /// Slot filter
    pub criteria: ScanCriteria,
    /// Endpoint flavor
    pub fetch_mode: FetchMode,
}

impl ScanConfig {
    /// Scan the default campgrounds over `window` with default criteria
    pub fn new(window: DateWindow, weekdays: WeekdaySet) -> Self {
        Self {
            campgrounds: default_campgrounds(),
            window,
            criteria: ScanCriteria::new(weekdays),
            fetch_mode: FetchMode::Range,
        }
    }

    /// Replace the campground list
    pub fn with_campgrounds(mut self, campgrounds: Vec<Campground>) -> Self {
        self.campgrounds = campgrounds;
        self
    }

    /// Switch the endpoint flavor
    pub fn with_fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.fetch_mode = fetch_mode;
        self
    }
}

/// Custom error type for scan operations
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid date range
    #[error("Invalid date range: end date must not be before start date")]
    InvalidDateRange,

    /// Date not in `YYYY-MM-DD` form
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Weekday index outside 0-6
    #[error("Invalid day to include '{0}': expected an integer from 0 (Monday) to 6 (Sunday)")]
    InvalidWeekday(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// API error
    #[error("API error: {0}")]
    ApiError(#[from] RecGovError),

    /// A notification channel failed
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    /// CSV export failed
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_set_parse() {
        let set: WeekdaySet = "4, 5".parse().unwrap();

        assert!(set.contains(Weekday::Fri));
        assert!(set.contains(Weekday::Sat));
        assert!(!set.contains(Weekday::Sun));
        assert!(!set.contains(Weekday::Mon));
    }

    #[test]
    fn test_weekday_set_rejects_bad_input() {
        assert!(matches!(
            "4,7".parse::<WeekdaySet>(),
            Err(ScanError::InvalidWeekday(day)) if day == "7"
        ));
        assert!(matches!(
            "fri".parse::<WeekdaySet>(),
            Err(ScanError::InvalidWeekday(_))
        ));
        assert!(matches!(
            "".parse::<WeekdaySet>(),
            Err(ScanError::Validation(_))
        ));
    }

    #[test]
    fn test_weekday_set_all() {
        let set = WeekdaySet::all();
        for index in 0..7 {
            assert!(set.contains(Weekday::try_from(index as u8).unwrap()));
        }
    }

    #[test]
    fn test_window_defaults_end_to_next_day() {
        let window = DateWindow::parse("2019-07-04", None).unwrap();
        assert_eq!(window.start, date(2019, 7, 4));
        assert_eq!(window.end, date(2019, 7, 5));

        let window = DateWindow::parse("2019-12-31", Some("")).unwrap();
        assert_eq!(window.end, date(2020, 1, 1));
    }

    #[test]
    fn test_window_rejects_reversed_range() {
        assert!(matches!(
            DateWindow::parse("2019-07-10", Some("2019-07-04")),
            Err(ScanError::InvalidDateRange)
        ));
        assert!(matches!(
            DateWindow::parse("07/04/2019", None),
            Err(ScanError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_window_months() {
        let window = DateWindow::new(date(2019, 11, 20), date(2020, 1, 3)).unwrap();
        assert_eq!(
            window.months(),
            vec![date(2019, 11, 1), date(2019, 12, 1), date(2020, 1, 1)]
        );

        let single = DateWindow::new(date(2019, 7, 4), date(2019, 7, 5)).unwrap();
        assert_eq!(single.months(), vec![date(2019, 7, 1)]);
    }

    #[test]
    fn test_criteria_window_is_inclusive() {
        let window = DateWindow::new(date(2019, 7, 5), date(2019, 7, 6)).unwrap();
        let criteria = ScanCriteria::new(WeekdaySet::all()).within(window);

        assert!(!criteria.accepts_date(date(2019, 7, 4)));
        assert!(criteria.accepts_date(date(2019, 7, 5)));
        assert!(criteria.accepts_date(date(2019, 7, 6)));
        assert!(!criteria.accepts_date(date(2019, 7, 7)));
    }

    #[test]
    fn test_default_campgrounds_order() {
        let ids: Vec<String> = default_campgrounds().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["232447", "232450", "232449", "232448", "232446"]);
    }
}
