use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::{EmailService, EmailSettings, NotificationError};

/// Gmail SMTP relay host.
pub const GMAIL_SMTP_HOST: &str = "smtp.gmail.com";

/// Implicit-TLS submission port.
pub const GMAIL_SMTP_PORT: u16 = 465;

/// Sends email through Gmail over implicit TLS
pub struct GmailSmtpService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl GmailSmtpService {
    /// Create a Gmail SMTP service authenticated as `settings.account`
    pub fn new(settings: &EmailSettings) -> Result<Self, NotificationError> {
        let from = parse_mailbox(&settings.account)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(GMAIL_SMTP_HOST)
            .map_err(|e| NotificationError::Email(format!("Failed to configure SMTP relay: {}", e)))?
            .port(GMAIL_SMTP_PORT)
            .credentials(Credentials::new(
                settings.account.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse()
        .map_err(|e| NotificationError::Email(format!("Invalid email address {}: {}", address, e)))
}

/// Build the plain-text message sent by [`GmailSmtpService`].
fn build_message(
    from: Mailbox,
    to: &str,
    subject: &str,
    body: &str,
    message_id: &str,
) -> Result<Message, NotificationError> {
    Message::builder()
        .from(from)
        .to(parse_mailbox(to)?)
        .subject(subject)
        .message_id(Some(message_id.to_string()))
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| NotificationError::Email(format!("Failed to build email: {}", e)))
}

#[async_trait]
impl EmailService for GmailSmtpService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError> {
        info!("Sending email to {} with subject: {}", to, subject);

        let message_id = format!("<{}@campground-scan>", uuid::Uuid::new_v4());
        let email = build_message(self.from.clone(), to, subject, body, &message_id)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotificationError::Email(format!("SMTP delivery failed: {}", e)))?;

        Ok(message_id)
    }
}

/// Email service that only logs, for dry runs
pub struct LogEmailService;

#[async_trait]
impl EmailService for LogEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError> {
        info!("📧 [DRY RUN EMAIL] To: {}", to);
        info!("📧 [DRY RUN EMAIL] Subject: {}", subject);
        info!("📧 [DRY RUN EMAIL] Body:\n{}", body);

        Ok(format!("dry-run-email-{}", uuid::Uuid::new_v4()))
    }
}
