//! NASA's APOD endpoint, queried by date range.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use url::Url;

use super::{build_client, get_json_array, FeedSource};
use crate::error::FetchError;
use crate::range::{DateRange, DATE_FORMAT};

pub const DEFAULT_API_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Rate-limited shared key that works without registration.
pub const DEMO_KEY: &str = "DEMO_KEY";

pub struct ApodApi {
    base_url: String,
    api_key: String,
    client: Client,
}

impl ApodApi {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: build_client(timeout)?,
        })
    }

    /// Request URL for `range`.  `thumbs=true` makes the API include
    /// `thumbnail_url` on video entries.
    pub fn request_url(&self, range: &DateRange) -> Result<Url, FetchError> {
        let start = range.start().format(DATE_FORMAT).to_string();
        let end = range.end().format(DATE_FORMAT).to_string();
        Url::parse_with_params(
            &self.base_url,
            &[
                ("api_key", self.api_key.as_str()),
                ("start_date", start.as_str()),
                ("end_date", end.as_str()),
                ("thumbs", "true"),
            ],
        )
        .map_err(|e| FetchError::Parse(format!("bad API URL '{}': {e}", self.base_url)))
    }
}

impl FeedSource for ApodApi {
    fn name(&self) -> &str {
        "NASA APOD"
    }

    fn requires_range(&self) -> bool {
        true
    }

    fn fetch(&self, range: Option<&DateRange>) -> Result<Vec<Value>, FetchError> {
        let range = range.ok_or_else(|| FetchError::RangeRequired {
            source_name: self.name().to_string(),
        })?;
        let url = self.request_url(range)?;
        get_json_array(&self.client, url.as_str())
    }
}
