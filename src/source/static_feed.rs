//! A fixed JSON document mirroring the APOD feed.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::{build_client, get_json_array, FeedSource};
use crate::error::FetchError;
use crate::range::DateRange;

/// Classroom mirror of the APOD feed, served from a CDN.
pub const DEFAULT_STATIC_URL: &str = "https://cdn.jsdelivr.net/gh/GCA-Classroom/apod/data.json";

pub struct StaticFeed {
    url: String,
    client: Client,
}

impl StaticFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            url: url.into(),
            client: build_client(timeout)?,
        })
    }
}

impl FeedSource for StaticFeed {
    fn name(&self) -> &str {
        "APOD mirror"
    }

    fn requires_range(&self) -> bool {
        false
    }

    /// The document has no query parameters; any range is applied by the
    /// caller after normalization.
    fn fetch(&self, _range: Option<&DateRange>) -> Result<Vec<Value>, FetchError> {
        get_json_array(&self.client, &self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetches_document_without_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/apod/data.json")
            .match_query(mockito::Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"title":"A","date":"2024-01-01","media_type":"image","url":"u"}]"#)
            .create();

        let feed = StaticFeed::new(
            format!("{}/apod/data.json", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();
        let records = feed.fetch(None).unwrap();

        mock.assert();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "A");
    }

    #[test]
    fn empty_array_is_not_an_error() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/data.json").with_body("[]").create();

        let feed = StaticFeed::new(format!("{}/data.json", server.url()), Duration::from_secs(5))
            .unwrap();
        assert!(feed.fetch(None).unwrap().is_empty());
    }

    #[test]
    fn not_found_is_a_network_error() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/data.json").with_status(404).create();

        let feed = StaticFeed::new(format!("{}/data.json", server.url()), Duration::from_secs(5))
            .unwrap();
        match feed.fetch(None) {
            Err(FetchError::Network { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected 404, got {other:?}"),
        }
    }

    #[test]
    fn does_not_require_range() {
        let feed = StaticFeed::new(DEFAULT_STATIC_URL, Duration::from_secs(5)).unwrap();
        assert!(!feed.requires_range());
    }
}
