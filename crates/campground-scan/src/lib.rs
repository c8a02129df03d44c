//! # Campground Scan
//!
//! This crate checks recreation.gov for open campsites and tells someone about them.
//! A run fetches availability for every configured campground, keeps the slots that
//! match the scan criteria, and fans the result out over email, SMS and a CSV file.

/// Types for campground scan operations
mod scan_types;
pub use scan_types::*;

/// Per-campsite availability filter
mod filter;
pub use filter::*;

/// Aggregates availability across campgrounds
mod executor;
pub use executor::*;

/// Credentials for the notification channels
mod settings;
pub use settings::*;

/// Notification traits and fan-out
mod notification_service;
pub use notification_service::*;

/// Gmail SMTP email channel
mod email_service;
pub use email_service::*;

/// Twilio SMS channel
mod sms_service;
pub use sms_service::*;

/// CSV export of matches
mod export;
pub use export::*;

/// One complete scan-notify-export pass
mod runner;
pub use runner::*;
