//! # RecGov
//!
//! This crate provides a client for the recreation.gov availability API, which reports
//! the per-date reservation status of every campsite in a campground.

/// Availability client and wire types.
mod availability;
pub use availability::*;

/// Errors raised while talking to recreation.gov.
mod error;
pub use error::*;

/// Order-preserving decoding of JSON objects.
mod ordered;
