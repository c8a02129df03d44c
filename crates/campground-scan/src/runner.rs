use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::{
    CsvExporter, DeliveryReport, EmailSettings, GmailSmtpService, LogEmailService,
    LogSmsService, NotificationError, Notifier, ScanError, ScanReport, Scanner, SmsSettings,
    TwilioSmsService,
};

/// Build a notifier with a real channel for every settings block present.
pub fn notifier_from_settings(
    email: Option<&EmailSettings>,
    sms: Option<&SmsSettings>,
) -> Result<Notifier, NotificationError> {
    let mut notifier = Notifier::new();

    if let Some(settings) = sms {
        notifier = notifier.with_sms(
            Arc::new(TwilioSmsService::new(settings)?),
            settings.to_number.clone(),
        );
    }

    if let Some(settings) = email {
        notifier = notifier.with_email(
            Arc::new(GmailSmtpService::new(settings)?),
            settings.recipient(),
        );
    }

    Ok(notifier)
}

/// Same channels as [`notifier_from_settings`], but every message is only logged.
pub fn dry_run_notifier(email: Option<&EmailSettings>, sms: Option<&SmsSettings>) -> Notifier {
    let mut notifier = Notifier::new();

    if let Some(settings) = sms {
        notifier = notifier.with_sms(Arc::new(LogSmsService), settings.to_number.clone());
    }

    if let Some(settings) = email {
        notifier = notifier.with_email(Arc::new(LogEmailService), settings.recipient());
    }

    notifier
}

/// What a complete run produced
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Scan result, failures included
    pub report: ScanReport,
    /// Notification fan-out result; its message is empty when nothing was found
    pub delivery: DeliveryReport,
    /// CSV file written, if any
    pub export_path: Option<PathBuf>,
}

impl RunOutcome {
    /// The composed notification body, empty if nothing was found
    pub fn message(&self) -> &str {
        &self.delivery.message
    }
}

/// One scan, notify and export pass
pub struct ScanRun {
    scanner: Scanner,
    notifier: Notifier,
    exporter: Option<CsvExporter>,
}

impl ScanRun {
    /// Create a run without file export
    pub fn new(scanner: Scanner, notifier: Notifier) -> Self {
        Self {
            scanner,
            notifier,
            exporter: None,
        }
    }

    /// Also write matches to CSV
    pub fn with_exporter(mut self, exporter: CsvExporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Scan, then notify and export if anything was found.
    ///
    /// Fetch failures only show up in the report; notification and export
    /// failures end the run with an error.
    pub async fn execute(&self) -> Result<RunOutcome, ScanError> {
        let report = self.scanner.run().await;

        if !report.has_matches() {
            info!("No campsites available.");
            return Ok(RunOutcome {
                report,
                ..Default::default()
            });
        }

        let delivery = self
            .notifier
            .send_availability_notification(&report.matches)
            .await?;

        let export_path = match self.exporter {
            Some(ref exporter) => Some(exporter.write(&self.scanner.window(), &report.matches)?),
            None => None,
        };

        Ok(RunOutcome {
            report,
            delivery,
            export_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rec_gov::{CampgroundAvailabilityResponse, RecGovError};
    use tempfile::TempDir;

    use super::*;
    use crate::{
        AvailabilitySource, Campground, DateWindow, EmailService, ScanConfig, SmsService,
    };

    struct JsonSource(String);

    #[async_trait]
    impl AvailabilitySource for JsonSource {
        async fn campground_availability(
            &self,
            _campground_id: &str,
            _window: &DateWindow,
        ) -> Result<CampgroundAvailabilityResponse, RecGovError> {
            serde_json::from_str(&self.0).map_err(|e| RecGovError::Decode(e.to_string()))
        }

        async fn monthly_availability(
            &self,
            _campground_id: &str,
            _month: NaiveDate,
        ) -> Result<CampgroundAvailabilityResponse, RecGovError> {
            Err(RecGovError::NotFound)
        }
    }

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EmailService for Outbox {
        async fn send_email(
            &self,
            to: &str,
            _subject: &str,
            _body: &str,
        ) -> Result<String, NotificationError> {
            self.sent.lock().unwrap().push(format!("email:{to}"));
            Ok("email-1".to_string())
        }
    }

    #[async_trait]
    impl SmsService for Outbox {
        async fn send_sms(&self, to: &str, _message: &str) -> Result<String, NotificationError> {
            self.sent.lock().unwrap().push(format!("sms:{to}"));
            Ok("sms-1".to_string())
        }
    }

    struct BrokenEmail;

    #[async_trait]
    impl EmailService for BrokenEmail {
        async fn send_email(
            &self,
            _to: &str,
            _subject: &str,
            _body: &str,
        ) -> Result<String, NotificationError> {
            Err(NotificationError::Email("535 bad credentials".to_string()))
        }
    }

    fn scanner(body: serde_json::Value) -> Scanner {
        let window = DateWindow::parse("2019-07-04", Some("2019-07-08")).unwrap();
        let config = ScanConfig::new(window, "4,5".parse().unwrap())
            .with_campgrounds(vec![Campground::new("232447", "UPPER PINES")]);
        Scanner::new(Arc::new(JsonSource(body.to_string())), config)
    }

    fn friday_available() -> serde_json::Value {
        serde_json::json!({
            "campsites": {
                "70926": {
                    "campsite_id": "70926",
                    "campsite_type": "STANDARD NONELECTRIC",
                    "availabilities": { "2019-07-05T00:00:00Z": "Available" }
                }
            }
        })
    }

    #[tokio::test]
    async fn test_matches_are_notified_and_exported() {
        let temp_dir = TempDir::new().unwrap();
        let outbox = Arc::new(Outbox::default());
        let notifier = Notifier::new()
            .with_sms(outbox.clone(), "+15557654321")
            .with_email(outbox.clone(), "camper@gmail.com");
        let run = ScanRun::new(scanner(friday_available()), notifier)
            .with_exporter(CsvExporter::new(temp_dir.path()));

        let outcome = run.execute().await.unwrap();

        assert_eq!(
            outcome.message(),
            "\nUPPER PINES, Booking URL: https://www.recreation.gov/camping/campsites/70926, available on 2019-07-05 (Friday).\n"
        );
        assert_eq!(
            *outbox.sent.lock().unwrap(),
            vec!["sms:+15557654321", "email:camper@gmail.com"]
        );
        let path = outcome.export_path.unwrap();
        assert_eq!(
            path,
            temp_dir.path().join("results_2019-07-04_2019-07-08.csv")
        );
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_no_matches_means_no_notification_and_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let outbox = Arc::new(Outbox::default());
        let notifier = Notifier::new().with_email(outbox.clone(), "camper@gmail.com");
        let run = ScanRun::new(
            scanner(serde_json::json!({ "campsites": {} })),
            notifier,
        )
        .with_exporter(CsvExporter::new(temp_dir.path().join("results")));

        let outcome = run.execute().await.unwrap();

        assert_eq!(outcome.message(), "");
        assert!(outbox.sent.lock().unwrap().is_empty());
        assert!(outcome.export_path.is_none());
        assert!(!temp_dir.path().join("results").exists());
    }

    #[tokio::test]
    async fn test_notification_failure_aborts_run_before_export() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = Notifier::new().with_email(Arc::new(BrokenEmail), "camper@gmail.com");
        let run = ScanRun::new(scanner(friday_available()), notifier)
            .with_exporter(CsvExporter::new(temp_dir.path().join("results")));

        let err = run.execute().await.unwrap_err();

        assert!(matches!(
            err,
            ScanError::Notification(NotificationError::Email(_))
        ));
        assert!(!temp_dir.path().join("results").exists());
    }

    #[test]
    fn test_dry_run_notifier_mirrors_configured_channels() {
        let email = EmailSettings {
            account: "camper@gmail.com".to_string(),
            password: "app-password".to_string(),
            recipient: None,
        };

        assert!(dry_run_notifier(Some(&email), None).has_channels());
        assert!(!dry_run_notifier(None, None).has_channels());
    }
}
