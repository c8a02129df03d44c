use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::ScanError;

// E.164, the only form Twilio accepts
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{6,14}$").unwrap());

/// Gmail account used to send (and by default receive) notifications
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailSettings {
    /// Gmail address, also the SMTP user name
    #[validate(email(message = "Gmail account must be an email address"))]
    pub account: String,

    /// Gmail password or app password
    #[validate(length(min = 1, message = "Gmail password is required"))]
    pub password: String,

    /// Where to send notifications; defaults to the account itself
    #[serde(default)]
    #[validate(email(message = "Recipient must be an email address"))]
    pub recipient: Option<String>,
}

impl EmailSettings {
    /// Address notifications go to
    pub fn recipient(&self) -> &str {
        self.recipient.as_deref().unwrap_or(&self.account)
    }
}

/// Twilio account used to send SMS notifications
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SmsSettings {
    /// Twilio account SID
    #[validate(length(min = 1, message = "Twilio account SID is required"))]
    pub account_sid: String,

    /// Twilio auth token
    #[validate(length(min = 1, message = "Twilio auth token is required"))]
    pub auth_token: String,

    /// Twilio number messages are sent from
    #[validate(regex(
        path = *PHONE_REGEX,
        message = "Sender number must be in E.164 form, e.g. +15551234567"
    ))]
    pub from_number: String,

    /// Number messages are sent to
    #[validate(regex(
        path = *PHONE_REGEX,
        message = "Recipient number must be in E.164 form, e.g. +15551234567"
    ))]
    pub to_number: String,
}

/// Run `validator` rules and turn failures into [`ScanError::Validation`].
pub fn validate_settings<T: Validate>(settings: &T) -> Result<(), ScanError> {
    settings
        .validate()
        .map_err(|e| ScanError::Validation(e.to_string()))
}
