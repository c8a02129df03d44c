use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::{NotificationError, SmsService, SmsSettings};

/// Root of the Twilio REST API.
pub const TWILIO_API_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: String,
    #[serde(default)]
    code: Option<i64>,
}

impl TwilioSmsService {
    /// Create a Twilio SMS service
    pub fn new(settings: &SmsSettings) -> Result<Self, NotificationError> {
        Self::with_base_url(settings, TWILIO_API_BASE_URL)
    }

    /// Create a Twilio SMS service with a custom API root (for testing)
    pub fn with_base_url(settings: &SmsSettings, base_url: &str) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotificationError::Sms(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_sid: settings.account_sid.clone(),
            auth_token: settings.auth_token.clone(),
            from_number: settings.from_number.clone(),
        })
    }
}

#[async_trait]
impl SmsService for TwilioSmsService {
    async fn send_sms(&self, to: &str, message: &str) -> Result<String, NotificationError> {
        info!("Sending SMS to {} from {}", to, self.from_number);

        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let params = [
            ("To", to),
            ("From", self.from_number.as_str()),
            ("Body", message),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| NotificationError::Sms(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<TwilioErrorBody>().await {
                Ok(body) => match body.code {
                    Some(code) => format!("{} (code {})", body.message, code),
                    None => body.message,
                },
                Err(_) => "no error details".to_string(),
            };
            return Err(NotificationError::Sms(format!(
                "Twilio returned HTTP {}: {}",
                status, detail
            )));
        }

        let sent: TwilioMessage = response
            .json()
            .await
            .map_err(|e| NotificationError::Sms(format!("Failed to parse response: {}", e)))?;

        Ok(sent.sid)
    }
}

/// SMS service that only logs, for dry runs
pub struct LogSmsService;

#[async_trait]
impl SmsService for LogSmsService {
    async fn send_sms(&self, to: &str, message: &str) -> Result<String, NotificationError> {
        info!("📱 [DRY RUN SMS] To: {}", to);
        info!("📱 [DRY RUN SMS] Message: {}", message);

        Ok(format!("dry-run-sms-{}", uuid::Uuid::new_v4()))
    }
}
