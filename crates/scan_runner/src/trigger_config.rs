use campground_scan::{
    DateWindow, EmailSettings, ScanConfig, ScanError, SmsSettings, WeekdaySet, validate_settings,
};

/// Configuration of an event-triggered run, read from environment variables.
///
/// Required: `gmail_account`, `gmail_password`, `start_date`, `days_to_include`.
/// `end_date` defaults to the day after `start_date`. SMS is enabled only when
/// `twilio_account_sid`, `twilio_auth_token`, `twilio_from_num` and `twilio_to_num`
/// are all set. The campground list is always [`campground_scan::default_campgrounds`].
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Email channel
    pub email: EmailSettings,
    /// Optional SMS channel
    pub sms: Option<SmsSettings>,
    /// Dates to scan
    pub window: DateWindow,
    /// Accepted weekdays
    pub weekdays: WeekdaySet,
}

impl TriggerConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ScanError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    ScanError::ConfigError(format!("{} environment variable not set", key))
                })
        };

        let email = EmailSettings {
            account: require("gmail_account")?,
            password: require("gmail_password")?,
            recipient: None,
        };
        validate_settings(&email)?;

        let window = DateWindow::parse(&require("start_date")?, lookup("end_date").as_deref())?;
        let weekdays: WeekdaySet = require("days_to_include")?.parse()?;

        let twilio_keys = [
            "twilio_account_sid",
            "twilio_auth_token",
            "twilio_from_num",
            "twilio_to_num",
        ];
        let sms = match twilio_keys.map(|key| lookup(key)) {
            [Some(account_sid), Some(auth_token), Some(from_number), Some(to_number)] => {
                let sms = SmsSettings {
                    account_sid,
                    auth_token,
                    from_number,
                    to_number,
                };
                validate_settings(&sms)?;
                Some(sms)
            }
            [None, None, None, None] => None,
            _ => {
                return Err(ScanError::ConfigError(
                    "Twilio needs twilio_account_sid, twilio_auth_token, twilio_from_num and twilio_to_num"
                        .to_string(),
                ));
            }
        };

        Ok(Self {
            email,
            sms,
            window,
            weekdays,
        })
    }

    /// Scan configuration for the default campgrounds.
    ///
    /// Triggered runs scan the same five campgrounds as the CLI, Tuolumne
    /// Meadows and Wawona included, not only the three Pines campgrounds.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new(self.window, self.weekdays)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("gmail_account", "camper@gmail.com"),
        ("gmail_password", "app-password"),
        ("start_date", "2019-07-04"),
        ("end_date", "2019-07-08"),
        ("days_to_include", "4,5"),
    ];

    #[test]
    fn test_reads_email_only_config() {
        let config = TriggerConfig::from_lookup(lookup(BASE)).unwrap();

        assert_eq!(config.email.recipient(), "camper@gmail.com");
        assert!(config.sms.is_none());
        assert_eq!(config.window.end.to_string(), "2019-07-08");
        assert_eq!(config.weekdays, "4,5".parse::<WeekdaySet>().unwrap());
        assert_eq!(config.scan_config().campgrounds.len(), 5);
    }

    #[test]
    fn test_scans_every_default_campground_in_order() {
        let config = TriggerConfig::from_lookup(lookup(BASE)).unwrap();

        let names: Vec<String> = config
            .scan_config()
            .campgrounds
            .into_iter()
            .map(|campground| campground.name)
            .collect();

        assert_eq!(
            names,
            vec![
                "UPPER PINES",
                "LOWER PINES",
                "NORTH PINES",
                "TUOLOMNE MEADOWS",
                "Wawona"
            ]
        );
    }

    #[test]
    fn test_missing_required_variable() {
        let vars: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "gmail_password")
            .collect();

        let err = TriggerConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("gmail_password"));
    }

    #[test]
    fn test_end_date_is_optional() {
        let vars: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "end_date")
            .collect();

        let config = TriggerConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.window.end.to_string(), "2019-07-05");
    }

    #[test]
    fn test_twilio_enabled_when_complete() {
        let mut vars = BASE.to_vec();
        vars.extend([
            ("twilio_account_sid", "AC123"),
            ("twilio_auth_token", "secret"),
            ("twilio_from_num", "+15551234567"),
            ("twilio_to_num", "+15557654321"),
        ]);

        let config = TriggerConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.sms.unwrap().to_number, "+15557654321");
    }

    #[test]
    fn test_partial_twilio_config_is_rejected() {
        let mut vars = BASE.to_vec();
        vars.push(("twilio_account_sid", "AC123"));

        assert!(matches!(
            TriggerConfig::from_lookup(lookup(&vars)),
            Err(ScanError::ConfigError(_))
        ));
    }

    #[test]
    fn test_bad_days_are_rejected() {
        let mut vars = BASE.to_vec();
        vars.retain(|(k, _)| *k != "days_to_include");
        vars.push(("days_to_include", "4,8"));

        assert!(matches!(
            TriggerConfig::from_lookup(lookup(&vars)),
            Err(ScanError::InvalidWeekday(_))
        ));
    }
}
