use std::sync::Arc;

use tracing::{error, info};

use crate::AvailabilityMatch;

/// Subject line of every availability email.
///
/// Earlier deployments sent "Yosemite Campground Availabilites Found"; mail
/// filters keyed on that misspelling need updating.
pub const EMAIL_SUBJECT: &str = "Yosemite Campground Availabilities Found";

/// Errors raised by notification channels
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Email could not be built or delivered
    #[error("Email error: {0}")]
    Email(String),
    /// SMS could not be delivered
    #[error("SMS error: {0}")]
    Sms(String),
}

/// Trait for email service implementations
#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    /// Send a plain-text email, returning the message id
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError>;
}

/// Trait for SMS service implementations
#[async_trait::async_trait]
pub trait SmsService: Send + Sync {
    /// Send a text message, returning the provider's message id
    async fn send_sms(&self, to: &str, message: &str) -> Result<String, NotificationError>;
}

/// Build the notification body: one paragraph per match, in match order.
pub fn compose_message(matches: &[AvailabilityMatch]) -> String {
    matches
        .iter()
        .map(|m| {
            format!(
                "\n{}, Booking URL: {}, available on {}.\n",
                m.park, m.url, m.date
            )
        })
        .collect()
}

/// What a notification fan-out did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Body that was sent; empty when there was nothing to send
    pub message: String,
    /// Provider id of the SMS, if one was sent
    pub sms_id: Option<String>,
    /// Message id of the email, if one was sent
    pub email_id: Option<String>,
}

struct Channel<S: ?Sized> {
    service: Arc<S>,
    recipient: String,
}

/// Sends availability notifications over every configured channel
pub struct Notifier {
    email: Option<Channel<dyn EmailService>>,
    sms: Option<Channel<dyn SmsService>>,
}

impl Notifier {
    /// A notifier with no channels
    pub fn new() -> Self {
        Self {
            email: None,
            sms: None,
        }
    }

    /// Also send email to `recipient`
    pub fn with_email(
        mut self,
        service: Arc<dyn EmailService>,
        recipient: impl Into<String>,
    ) -> Self {
        self.email = Some(Channel {
            service,
            recipient: recipient.into(),
        });
        self
    }

    /// Also send SMS to `recipient`
    pub fn with_sms(mut self, service: Arc<dyn SmsService>, recipient: impl Into<String>) -> Self {
        self.sms = Some(Channel {
            service,
            recipient: recipient.into(),
        });
        self
    }

    /// Whether at least one channel is configured
    pub fn has_channels(&self) -> bool {
        self.email.is_some() || self.sms.is_some()
    }

    /// Notify every channel about `matches`.
    ///
    /// Nothing is sent when `matches` is empty. SMS goes out before email; the first
    /// channel error stops the fan-out and is returned as is.
    pub async fn send_availability_notification(
        &self,
        matches: &[AvailabilityMatch],
    ) -> Result<DeliveryReport, NotificationError> {
        if matches.is_empty() {
            return Ok(DeliveryReport::default());
        }

        let message = compose_message(matches);
        let mut report = DeliveryReport {
            message,
            ..Default::default()
        };

        if !self.has_channels() {
            info!("No notification channels configured, {} matches not sent", matches.len());
        }

        if let Some(ref sms) = self.sms {
            let id = sms
                .service
                .send_sms(&sms.recipient, &report.message)
                .await
                .inspect_err(|e| error!("Failed to send SMS to {}: {}", sms.recipient, e))?;
            info!("SMS sent successfully to {}", sms.recipient);
            report.sms_id = Some(id);
        }

        if let Some(ref email) = self.email {
            let id = email
                .service
                .send_email(&email.recipient, EMAIL_SUBJECT, &report.message)
                .await
                .inspect_err(|e| error!("Failed to send email to {}: {}", email.recipient, e))?;
            info!("Email sent successfully to {}", email.recipient);
            report.email_id = Some(id);
        }

        Ok(report)
    }
}
