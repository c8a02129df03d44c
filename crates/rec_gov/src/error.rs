/// Errors returned by [`crate::AvailabilityClient`].
#[derive(Debug, thiserror::Error)]
pub enum RecGovError {
    /// The underlying HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// recreation.gov answered 429
    #[error("Rate limited by recreation.gov")]
    RateLimited,

    /// recreation.gov answered 404, usually an unknown campground id
    #[error("Campground not found")]
    NotFound,

    /// Any other non-2xx answer
    #[error("HTTP {status} - {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The body was not the JSON shape we expect
    #[error("Failed to parse response: {0}")]
    Decode(String),
}
