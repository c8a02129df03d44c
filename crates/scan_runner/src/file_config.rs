use std::fs;
use std::path::Path;

use campground_scan::{
    ACCEPTED_SITE_TYPE, AVAILABLE_STATUS, Campground, EmailSettings, ScanError, SmsSettings,
    default_campgrounds, validate_settings,
};
use serde::Deserialize;

/// Contents of the `campsites.toml` config file.
///
/// Every section is optional. A missing `[gmail]` or `[twilio]` section turns that
/// channel off; a missing `[[campgrounds]]` list falls back to the default Yosemite set.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Email channel credentials
    #[serde(default)]
    pub gmail: Option<EmailSettings>,

    /// SMS channel credentials
    #[serde(default)]
    pub twilio: Option<SmsSettings>,

    /// Slot filter overrides
    #[serde(default)]
    pub filter: FilterSection,

    /// Campgrounds to scan, in order
    #[serde(default)]
    pub campgrounds: Vec<Campground>,
}

/// `[filter]` section
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSection {
    /// Campsite type to report
    #[serde(default = "default_site_type")]
    pub site_type: String,

    /// Reservation status that means bookable
    #[serde(default = "default_available_status")]
    pub available_status: String,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            site_type: default_site_type(),
            available_status: default_available_status(),
        }
    }
}

fn default_site_type() -> String {
    ACCEPTED_SITE_TYPE.to_string()
}

fn default_available_status() -> String {
    AVAILABLE_STATUS.to_string()
}

impl FileConfig {
    /// Load and validate the config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        if !path.exists() {
            log::warn!(
                "Config file {} not found, using default campgrounds and no notification channels",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ScanError::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ScanError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ScanError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check credentials and the campground list
    pub fn validate(&self) -> Result<(), ScanError> {
        if let Some(ref gmail) = self.gmail {
            validate_settings(gmail)?;
        }
        if let Some(ref twilio) = self.twilio {
            validate_settings(twilio)?;
        }
        if let Some(campground) = self
            .campgrounds
            .iter()
            .find(|c| c.id.trim().is_empty() || c.name.trim().is_empty())
        {
            return Err(ScanError::Validation(format!(
                "Campground entries need an id and a name, got {:?}",
                campground
            )));
        }
        Ok(())
    }

    /// Campgrounds to scan
    pub fn campgrounds(&self) -> Vec<Campground> {
        if self.campgrounds.is_empty() {
            default_campgrounds()
        } else {
            self.campgrounds.clone()
        }
    }
}
