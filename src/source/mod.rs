//! Feed source abstraction layer.
//!
//! This module defines the [`FeedSource`] trait plus the normalized
//! [`FeedItem`] type.  Two concrete sources live in sub-modules:
//!
//! * [`StaticFeed`] — a fixed JSON document, no query parameters.
//! * [`ApodApi`] — NASA's date-parameterized APOD endpoint.
//!
//! Both return the raw JSON records; [`normalize`] turns them into
//! [`FeedItem`]s.  The request plumbing shared by both lives in
//! [`get_json_array`].

mod apod_api;
pub mod embed;
mod feed_item;
mod static_feed;

pub use apod_api::{ApodApi, DEFAULT_API_URL, DEMO_KEY};
pub use feed_item::{normalize, FeedItem, Media, MediaKind};
pub use static_feed::{StaticFeed, DEFAULT_STATIC_URL};

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::FetchError;
use crate::range::DateRange;

/// Trait that every feed source implements.
///
/// [`fetch()`](FeedSource::fetch) runs on a worker thread, so
/// implementations must be [`Send`] and [`Sync`].
pub trait FeedSource: Send + Sync {
    /// Human-readable label shown in the gallery title.
    fn name(&self) -> &str;

    /// Whether [`fetch`](FeedSource::fetch) needs a date range.
    fn requires_range(&self) -> bool;

    /// Perform exactly one request and return the raw records.
    fn fetch(&self, range: Option<&DateRange>) -> Result<Vec<Value>, FetchError>;
}

/// Build the blocking client used by both sources.
pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    let client = Client::builder()
        .user_agent(concat!("apod-gallery/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// GET `url` and decode the body as a JSON array.
///
/// Non-success statuses become [`FetchError::Network`], using the error
/// text from the body when the server sent one.
pub fn get_json_array(client: &Client, url: &str) -> Result<Vec<Value>, FetchError> {
    let resp = client.get(url).send()?;
    let status = resp.status();
    let body = resp.text()?;
    log::info!("GET {} -> {}", redact(url), status);

    if !status.is_success() {
        let message = error_message(&body)
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| "request failed".into());
        return Err(FetchError::Network {
            status: status.as_u16(),
            message,
        });
    }

    match serde_json::from_str::<Value>(&body)? {
        Value::Array(records) => Ok(records),
        other => Err(FetchError::Parse(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

/// Pull a human-readable message out of an API error body.
///
/// The APOD API uses `{"code": 400, "msg": "..."}` for bad parameters and
/// `{"error": {"code": "...", "message": "..."}}` for key problems.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("msg")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .and_then(Value::as_str)
        .map(String::from)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Hide the `api_key` query value in logged URLs.
pub(crate) fn redact(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            let pairs: Vec<(String, String)> = parsed
                .query_pairs()
                .map(|(k, v)| {
                    let v = if k == "api_key" { "***".into() } else { v.into_owned() };
                    (k.into_owned(), v)
                })
                .collect();
            if pairs.is_empty() {
                return parsed.to_string();
            }
            parsed.query_pairs_mut().clear().extend_pairs(pairs);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_reads_both_api_shapes() {
        assert_eq!(
            error_message(r#"{"code":400,"msg":"Date must be between Jun 16, 1995 and today."}"#)
                .as_deref(),
            Some("Date must be between Jun 16, 1995 and today.")
        );
        assert_eq!(
            error_message(r#"{"error":{"code":"API_KEY_INVALID","message":"An invalid api_key was supplied."}}"#)
                .as_deref(),
            Some("An invalid api_key was supplied.")
        );
        assert_eq!(error_message("<html>oops</html>"), None);
    }

    #[test]
    fn redact_hides_api_key_only() {
        let url = "https://api.nasa.gov/planetary/apod?api_key=SECRET&start_date=2024-01-01";
        let out = redact(url);
        assert!(!out.contains("SECRET"));
        assert!(out.contains("start_date=2024-01-01"));
    }

    #[test]
    fn non_array_payload_is_a_parse_error() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/feed.json")
            .with_status(200)
            .with_body(r#"{"title":"single"}"#)
            .create();

        let client = build_client(Duration::from_secs(5)).unwrap();
        let err = get_json_array(&client, &format!("{}/feed.json", server.url())).unwrap_err();

        mock.assert();
        match err {
            FetchError::Parse(msg) => assert!(msg.contains("an object")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/feed.json")
            .with_status(200)
            .with_body("[{]")
            .create();

        let client = build_client(Duration::from_secs(5)).unwrap();
        let err = get_json_array(&client, &format!("{}/feed.json", server.url())).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn error_status_falls_back_to_reason_phrase() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/feed.json")
            .with_status(503)
            .with_body("upstream down")
            .create();

        let client = build_client(Duration::from_secs(5)).unwrap();
        let err = get_json_array(&client, &format!("{}/feed.json", server.url())).unwrap_err();
        match err {
            FetchError::Network { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("expected network error, got {other:?}"),
        }
    }
}
