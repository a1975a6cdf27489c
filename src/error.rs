//! Error types for the fetch-and-render pipeline.
//!
//! Two families, matching the two places a request can fail:
//!
//! * [`RangeError`] — input validation, raised before any request is made.
//! * [`FetchError`] — everything that can go wrong during the single HTTP
//!   request and the decoding of its body.
//!
//! Neither is fatal: the UI turns both into status text and stays
//! interactive.

use chrono::NaiveDate;
use thiserror::Error;

/// Validation failure while turning the date fields into a [`DateRange`].
///
/// [`DateRange`]: crate::range::DateRange
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Please enter a start date first")]
    MissingInput,

    #[error("Invalid {field} date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("End date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Start date {start} is in the future (today is {today})")]
    FutureDateRejected { start: NaiveDate, today: NaiveDate },
}

/// Failure of one feed request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Network { status: u16, message: String },

    /// The body was not JSON, or not an array of records.
    #[error("Unexpected feed payload: {0}")]
    Parse(String),

    /// Connection, TLS or timeout failure before a status was received.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A date-parameterized source was asked to fetch without a range.
    #[error("{source_name} needs a start date")]
    RangeRequired { source_name: String },
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}
